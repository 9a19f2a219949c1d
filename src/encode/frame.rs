use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::EncodeSettings;
use crate::encode::formats::encode_image;
use crate::foundation::core::{FrameIndex, OutputFormat, Resolution, frame_file_name};
use crate::foundation::error::TurntableResult;
use crate::render::backend::FrameRGBA;

/// What happened to one format of one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Encoded from the rendered frame and written.
    Written,
    /// Target file already existed; left untouched.
    Skipped,
    /// Encoding or writing failed; the message is the error text.
    Failed(String),
    /// A flat placeholder was written instead of the rendered frame.
    Placeholder,
}

/// Per-format outcomes for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameEncodeReport {
    /// Frame the report belongs to.
    pub frame: FrameIndex,
    /// One entry per configured format, in attempt order.
    pub outcomes: Vec<(OutputFormat, FormatOutcome)>,
}

impl FrameEncodeReport {
    /// Outcome recorded for `format`, if it is configured.
    pub fn outcome(&self, format: OutputFormat) -> Option<&FormatOutcome> {
        self.outcomes
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, o)| o)
    }

    /// Return `true` if any format fell back to a placeholder.
    pub fn used_placeholder(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| *o == FormatOutcome::Placeholder)
    }

    /// Number of formats that ended in [`FormatOutcome::Failed`].
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FormatOutcome::Failed(_)))
            .count()
    }
}

/// Writes one frame in every configured format.
///
/// Each format is independent: an existing file is skipped, and a failing encoder does not stop
/// the others. When every attempted format fails, a flat placeholder is written in their place so
/// no frame index is ever left without an image.
#[derive(Clone, Debug)]
pub struct FrameEncoder<'a> {
    settings: &'a EncodeSettings,
    resolution: Resolution,
}

impl<'a> FrameEncoder<'a> {
    /// Create an encoder using fixed settings; placeholders are drawn at `resolution`.
    pub fn new(settings: &'a EncodeSettings, resolution: Resolution) -> Self {
        Self {
            settings,
            resolution,
        }
    }

    /// Path of `index` in `format` under `dir`.
    pub fn target_path(dir: &Path, index: FrameIndex, format: OutputFormat) -> PathBuf {
        dir.join(frame_file_name(index, format))
    }

    /// Encode and write `frame` as `dir/{index}.{ext}` for every configured format.
    pub fn encode_frame(
        &self,
        frame: &FrameRGBA,
        dir: &Path,
        index: FrameIndex,
    ) -> FrameEncodeReport {
        let mut outcomes = Vec::with_capacity(self.settings.formats.len());
        for &format in &self.settings.formats {
            let path = Self::target_path(dir, index, format);
            if path.is_file() {
                tracing::debug!(frame = index.0, %format, "format exists, skipping");
                outcomes.push((format, FormatOutcome::Skipped));
                continue;
            }

            let written = encode_image(frame, format, self.settings)
                .and_then(|bytes| write_atomic(&path, &bytes));
            match written {
                Ok(()) => outcomes.push((format, FormatOutcome::Written)),
                Err(e) => {
                    tracing::warn!(frame = index.0, %format, error = %e, "format encode failed");
                    outcomes.push((format, FormatOutcome::Failed(e.to_string())));
                }
            }
        }

        let attempted = outcomes
            .iter()
            .filter(|(_, o)| *o != FormatOutcome::Skipped)
            .count();
        let failed = outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FormatOutcome::Failed(_)))
            .count();
        if attempted > 0 && failed == attempted {
            tracing::warn!(frame = index.0, "all formats failed, writing placeholder");
            self.fill_with_placeholder(dir, index, &mut outcomes);
        }

        FrameEncodeReport {
            frame: index,
            outcomes,
        }
    }

    /// Write a placeholder for every configured format of `index` that does not exist yet.
    pub fn write_placeholder_frame(&self, dir: &Path, index: FrameIndex) -> FrameEncodeReport {
        let mut outcomes: Vec<(OutputFormat, FormatOutcome)> = self
            .settings
            .formats
            .iter()
            .map(|&format| {
                if Self::target_path(dir, index, format).is_file() {
                    (format, FormatOutcome::Skipped)
                } else {
                    (format, FormatOutcome::Failed("frame was not rendered".to_string()))
                }
            })
            .collect();
        self.fill_with_placeholder(dir, index, &mut outcomes);
        FrameEncodeReport {
            frame: index,
            outcomes,
        }
    }

    fn fill_with_placeholder(
        &self,
        dir: &Path,
        index: FrameIndex,
        outcomes: &mut [(OutputFormat, FormatOutcome)],
    ) {
        let placeholder = FrameRGBA::solid(self.resolution, self.settings.placeholder_rgba);
        for (format, outcome) in outcomes.iter_mut() {
            if !matches!(outcome, FormatOutcome::Failed(_)) {
                continue;
            }
            let path = Self::target_path(dir, index, *format);
            let written = encode_image(&placeholder, *format, self.settings)
                .and_then(|bytes| write_atomic(&path, &bytes));
            match written {
                Ok(()) => *outcome = FormatOutcome::Placeholder,
                Err(e) => {
                    tracing::error!(
                        frame = index.0,
                        %format,
                        error = %e,
                        "placeholder write failed"
                    );
                }
            }
        }
    }
}

/// Write `bytes` to a temporary sibling of `path` and rename it into place.
///
/// A partially written file therefore never appears under the final name.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> TurntableResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("move '{}' into place", path.display()))
            .into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frame.rs"]
mod tests;
