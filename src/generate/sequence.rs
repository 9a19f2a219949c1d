use std::path::Path;

use anyhow::Context as _;

use crate::config::{PipelineConfig, SkipPolicy};
use crate::encode::frame::{FormatOutcome, FrameEncoder};
use crate::foundation::core::{FrameIndex, OutputFormat, validate_path_component};
use crate::foundation::error::{TurntableError, TurntableResult};
use crate::generate::progress::{FrameOutcome, FrameProgress, ProgressObserver, SequenceReport};
use crate::material::MaterialPreset;
use crate::model::ModelAsset;
use crate::render::backend::{RenderBackend, SequenceSession};

/// Is `index` already produced in `dir` under `policy`?
pub fn frame_is_done(
    dir: &Path,
    index: FrameIndex,
    formats: &[OutputFormat],
    policy: SkipPolicy,
) -> bool {
    let exists = |f: &OutputFormat| FrameEncoder::target_path(dir, index, *f).is_file();
    match policy {
        SkipPolicy::AnyFormat => formats.iter().any(exists),
        SkipPolicy::AllFormats => formats.iter().all(exists),
    }
}

/// Render and encode every frame of one (model, material) sequence.
///
/// Frames already on disk (per the configured [`SkipPolicy`]) are skipped without calling the
/// backend; if every frame is done, no render session is opened at all. A failed render is
/// logged and the loop moves on to the next angle. The backend session is closed on every exit
/// path.
///
/// Errors are returned when the sequence cannot start (session open, which may be
/// [`TurntableError::BackendUnavailable`], or output directory creation) or when the session is
/// lost mid-sequence ([`TurntableError::ends_sequence`]). In the latter case frames rendered so
/// far stay on disk and the remaining ones are left missing, without placeholders.
#[tracing::instrument(skip_all, fields(model = %model.name, material = %material.name))]
pub fn generate_sequence(
    config: &PipelineConfig,
    backend: &mut dyn RenderBackend,
    model: &ModelAsset,
    material: &MaterialPreset,
    job_id: Option<&str>,
    progress: &mut dyn ProgressObserver,
) -> TurntableResult<SequenceReport> {
    let dir = config.sequence_dir(&model.name, &material.name);
    let formats = &config.encode.formats;
    let mut report = SequenceReport::new(&model.name, &material.name);

    let notify = |progress: &mut dyn ProgressObserver, frame: FrameIndex, outcome| {
        progress.on_frame(&FrameProgress {
            job_id: job_id.map(str::to_string),
            model: model.name.clone(),
            material: material.name.clone(),
            frame,
            total: config.frame_count,
            outcome,
        });
    };

    let pending: Vec<FrameIndex> = config
        .frames()
        .filter(|&f| !frame_is_done(&dir, f, formats, config.skip_policy))
        .collect();
    if pending.is_empty() {
        tracing::info!(dir = %dir.display(), "sequence complete, nothing to render");
        for frame in config.frames() {
            report.record(FrameOutcome::Skipped);
            notify(&mut *progress, frame, FrameOutcome::Skipped);
        }
        return Ok(report);
    }

    let mut session = SequenceSession::open(backend, model, material)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create sequence directory '{}'", dir.display()))?;

    let encoder = FrameEncoder::new(&config.encode, config.resolution);
    tracing::info!(
        dir = %dir.display(),
        pending = pending.len(),
        "rendering sequence"
    );

    for frame in config.frames() {
        if !pending.contains(&frame) {
            tracing::info!(frame = frame.0, "exists, skipping");
            report.record(FrameOutcome::Skipped);
            notify(&mut *progress, frame, FrameOutcome::Skipped);
            continue;
        }

        let angle = config.angle_for(frame);
        let outcome = match session.render(angle) {
            Ok(rgba) => {
                let encoded = encoder.encode_frame(&rgba, &dir, frame);
                if encoded.used_placeholder() {
                    FrameOutcome::Placeholder
                } else if encoded.failed_count() > 0 {
                    FrameOutcome::PartiallyEncoded
                } else {
                    FrameOutcome::Rendered
                }
            }
            Err(e) if e.ends_sequence() => {
                tracing::error!(frame = frame.0, error = %e, "render session lost");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(frame = frame.0, angle, error = %e, "render failed");
                report.render_failed += 1;
                if config.placeholder_on_render_failure {
                    let filled = encoder.write_placeholder_frame(&dir, frame);
                    if filled
                        .outcomes
                        .iter()
                        .any(|(_, o)| *o == FormatOutcome::Placeholder)
                    {
                        FrameOutcome::Placeholder
                    } else {
                        FrameOutcome::Failed
                    }
                } else {
                    FrameOutcome::Failed
                }
            }
        };
        tracing::debug!(frame = frame.0, angle, ?outcome, "frame done");
        report.record(outcome);
        notify(&mut *progress, frame, outcome);
    }

    if let Err(e) = session.close() {
        tracing::warn!(error = %e, "render session did not close cleanly");
    }

    tracing::info!(
        rendered = report.rendered,
        skipped = report.skipped,
        render_failed = report.render_failed,
        placeholders = report.placeholders,
        "sequence finished"
    );
    Ok(report)
}

/// Generate one explicitly named sequence.
///
/// The material name and model file are validated before anything touches the filesystem or
/// the backend, so invalid input leaves no trace on disk.
pub fn generate_single(
    config: &PipelineConfig,
    backend: &mut dyn RenderBackend,
    model_id: &str,
    material_name: &str,
    job_id: Option<&str>,
    progress: &mut dyn ProgressObserver,
) -> TurntableResult<SequenceReport> {
    config.validate()?;

    let material = config.materials.get(material_name).ok_or_else(|| {
        TurntableError::validation(format!(
            "unknown material '{material_name}' (expected one of: {})",
            config.materials.names().join(", ")
        ))
    })?;

    validate_path_component("model", model_id)?;
    let model_path = config.model_path(model_id);
    if !model_path.is_file() {
        return Err(TurntableError::validation(format!(
            "model file '{}' does not exist",
            model_path.display()
        )));
    }
    let model = ModelAsset::load(&model_path)?;

    tracing::info!(
        model = %model.name,
        material = %material.name,
        job_id = job_id.unwrap_or("-"),
        "generating single sequence"
    );
    generate_sequence(config, backend, &model, material, job_id, progress)
}
