use crate::config::PipelineConfig;
use crate::foundation::error::TurntableResult;
use crate::generate::progress::{BatchReport, FailedSequence, ProgressObserver};
use crate::generate::sequence::generate_sequence;
use crate::model::{ModelAsset, discover_models};
use crate::render::backend::RenderBackend;

/// Generate every (model, material) sequence.
///
/// Models are discovered in `config.input_dir` and processed one at a time, each against every
/// material preset in table order. A model that cannot be loaded, or a sequence whose session
/// fails to open or dies midway, is recorded in [`BatchReport::failed`] and the batch moves on.
/// Only a fatal error ([`TurntableError::is_fatal`](crate::TurntableError::is_fatal)) stops the
/// run.
pub fn generate_all(
    config: &PipelineConfig,
    backend: &mut dyn RenderBackend,
    progress: &mut dyn ProgressObserver,
) -> TurntableResult<BatchReport> {
    config.validate()?;
    let models = discover_models(&config.input_dir, &config.model_extension)?;
    tracing::info!(
        models = models.len(),
        materials = config.materials.len(),
        input = %config.input_dir.display(),
        "starting batch"
    );

    let mut report = BatchReport::default();
    for path in &models {
        let model = match ModelAsset::load(path) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "skipping model");
                report.failed.push(FailedSequence {
                    model: path.display().to_string(),
                    material: None,
                    error: e.to_string(),
                });
                continue;
            }
        };

        for material in &config.materials {
            match generate_sequence(config, backend, &model, material, None, progress) {
                Ok(seq) => report.sequences.push(seq),
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "renderer unavailable, aborting batch");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(
                        model = %model.name,
                        material = %material.name,
                        error = %e,
                        "sequence abandoned"
                    );
                    report.failed.push(FailedSequence {
                        model: model.name.clone(),
                        material: Some(material.name.clone()),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        sequences = report.sequences.len(),
        failed = report.failed.len(),
        rendered = report.frames_rendered(),
        skipped = report.frames_skipped(),
        placeholders = report.frames_placeholder(),
        "batch finished"
    );
    Ok(report)
}
