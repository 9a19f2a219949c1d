use super::*;

#[test]
fn defaults_match_pipeline_constants() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.frame_count, 36);
    assert_eq!(cfg.resolution, Resolution::square(1024));
    assert_eq!(cfg.encode.formats, OutputFormat::ALL.to_vec());
    assert_eq!(cfg.skip_policy, SkipPolicy::AnyFormat);
    assert_eq!(cfg.input_dir, PathBuf::from(INPUT_DIR));
    assert_eq!(cfg.output_root, PathBuf::from(OUTPUT_ROOT));

    let angles: Vec<f64> = cfg.frames().map(|f| cfg.angle_for(f)).collect();
    assert_eq!(angles.len(), 36);
    assert_eq!(angles[0], 0.0);
    assert_eq!(angles[35], 350.0);
}

#[test]
fn with_roots_only_moves_directories() {
    let cfg = PipelineConfig::default().with_roots("in", "out");
    assert_eq!(cfg.input_dir, PathBuf::from("in"));
    assert_eq!(
        cfg.sequence_dir("ring-luxury-001", "rose-gold"),
        PathBuf::from("out").join("ring-luxury-001-rose-gold")
    );
    assert_eq!(cfg.frame_count, FRAME_COUNT);
}

#[test]
fn model_path_accepts_ids_with_or_without_extension() {
    let cfg = PipelineConfig::default().with_roots("models", "out");
    assert_eq!(
        cfg.model_path("ring-luxury-001"),
        PathBuf::from("models").join("ring-luxury-001.glb")
    );
    assert_eq!(
        cfg.model_path("ring-luxury-001.glb"),
        PathBuf::from("models").join("ring-luxury-001.glb")
    );
    assert_eq!(
        cfg.model_path("ring.GLB"),
        PathBuf::from("models").join("ring.GLB")
    );
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = PipelineConfig::default();
    cfg.frame_count = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.angle_step_deg = f64::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.encode.formats = vec![OutputFormat::Png, OutputFormat::Png];
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.encode.formats.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.encode.avif_quality = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.model_extension = ".glb".to_string();
    assert!(cfg.validate().is_err());
}
