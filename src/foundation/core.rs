use std::fmt;
use std::path::{Path, PathBuf};

use crate::foundation::error::{TurntableError, TurntableResult};

/// 0-based frame index within one turntable sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Rotation angle in degrees for this frame given a fixed angular step.
    ///
    /// Frame `i` is rendered at `i * step_deg`.
    pub fn angle_deg(self, step_deg: f64) -> f64 {
        f64::from(self.0) * step_deg
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// A square resolution of `size x size` pixels.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Byte length of a tightly packed RGBA8 buffer at this resolution.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Reject zero-sized resolutions.
    pub fn validate(self) -> TurntableResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TurntableError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Image encodings written for every frame.
///
/// Declaration order is the order formats are attempted in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// AV1 image file format.
    Avif,
    /// WebP.
    Webp,
    /// Portable Network Graphics.
    Png,
}

impl OutputFormat {
    /// Every supported format, in attempt order.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Png];

    /// File extension (without the dot) used for this format on disk.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Webp => "webp",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Directory name of one sequence: `{model}-{material}`.
///
/// Downstream viewers build this path by convention, so the shape must not change.
pub fn sequence_dir_name(model: &str, material: &str) -> String {
    format!("{model}-{material}")
}

/// Full path of one sequence directory under `output_root`.
pub fn sequence_dir(output_root: &Path, model: &str, material: &str) -> PathBuf {
    output_root.join(sequence_dir_name(model, material))
}

/// File name of one encoded frame: `{index}.{ext}`.
pub fn frame_file_name(index: FrameIndex, format: OutputFormat) -> String {
    format!("{}.{}", index.0, format.extension())
}

/// Validate a model or material identifier that is used as a path component.
///
/// Identifiers must be non-empty and must not contain path separators or parent traversals.
pub fn validate_path_component(kind: &str, value: &str) -> TurntableResult<()> {
    if value.trim().is_empty() {
        return Err(TurntableError::validation(format!(
            "{kind} identifier must be non-empty"
        )));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(TurntableError::validation(format!(
            "{kind} identifier '{value}' must not contain path separators"
        )));
    }
    if value == "." || value == ".." {
        return Err(TurntableError::validation(format!(
            "{kind} identifier '{value}' is not a valid name"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
