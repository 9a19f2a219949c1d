//! Immutable pipeline configuration.
//!
//! Everything here is a build-time constant. A [`PipelineConfig`] is constructed once at process
//! start (usually via [`PipelineConfig::default`]) and passed by reference into every component.

use std::path::{Path, PathBuf};

use crate::foundation::core::{FrameIndex, OutputFormat, Resolution, sequence_dir};
use crate::foundation::error::{TurntableError, TurntableResult};
use crate::material::MaterialTable;

/// Directory scanned for input models.
pub const INPUT_DIR: &str = "public/models";
/// Root directory that receives one sub-directory per sequence.
pub const OUTPUT_ROOT: &str = "public/images/sequences";
/// File extension of binary glTF models.
pub const MODEL_EXTENSION: &str = "glb";
/// Frames per turntable sequence.
pub const FRAME_COUNT: u32 = 36;
/// Rotation between consecutive frames, in degrees.
pub const ANGLE_STEP_DEG: f64 = 10.0;
/// Edge length of the square output frames.
pub const FRAME_SIZE: u32 = 1024;
/// Renderer program spawned once per sequence.
pub const RENDERER_PROGRAM: &str = "turntable-render-bridge";

/// When is a frame considered already produced?
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Done iff at least one configured format file exists.
    #[default]
    AnyFormat,
    /// Done iff every configured format file exists.
    AllFormats,
}

/// PNG deflate effort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PngCompression {
    /// Fastest compression.
    Fast,
    /// Encoder default.
    Default,
    /// Smallest output.
    #[default]
    Best,
}

/// Fixed per-format encoder settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    /// Formats written for each frame, in attempt order.
    pub formats: Vec<OutputFormat>,
    /// AVIF quality, 1..=100.
    pub avif_quality: u8,
    /// AVIF encoder speed, 1 (slowest) ..= 10 (fastest).
    pub avif_speed: u8,
    /// WebP quality, 1..=100.
    ///
    /// The WebP encoder in `image` only writes lossless WebP, so this value is carried for the
    /// record and does not change the output bytes.
    pub webp_quality: u8,
    /// PNG deflate effort.
    pub png_compression: PngCompression,
    /// Use adaptive per-row PNG filtering.
    pub png_adaptive_filtering: bool,
    /// Straight-alpha color of the fallback placeholder.
    pub placeholder_rgba: [u8; 4],
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            formats: OutputFormat::ALL.to_vec(),
            avif_quality: 80,
            avif_speed: 6,
            webp_quality: 85,
            png_compression: PngCompression::Best,
            png_adaptive_filtering: true,
            placeholder_rgba: [240, 240, 240, 255],
        }
    }
}

impl EncodeSettings {
    /// Reject empty or duplicated format lists and out-of-range quality values.
    pub fn validate(&self) -> TurntableResult<()> {
        if self.formats.is_empty() {
            return Err(TurntableError::validation(
                "at least one output format must be enabled",
            ));
        }
        for (i, f) in self.formats.iter().enumerate() {
            if self.formats[..i].contains(f) {
                return Err(TurntableError::validation(format!(
                    "output format '{f}' is listed more than once"
                )));
            }
        }
        if !(1..=100).contains(&self.avif_quality) {
            return Err(TurntableError::validation("avif quality must be 1..=100"));
        }
        if !(1..=10).contains(&self.avif_speed) {
            return Err(TurntableError::validation("avif speed must be 1..=10"));
        }
        if !(1..=100).contains(&self.webp_quality) {
            return Err(TurntableError::validation("webp quality must be 1..=100"));
        }
        Ok(())
    }
}

/// External renderer process settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererSettings {
    /// Program to spawn (looked up on `PATH` when not a path).
    pub program: PathBuf,
    /// Extra arguments passed to the program.
    pub args: Vec<String>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(RENDERER_PROGRAM),
            args: Vec::new(),
        }
    }
}

/// Complete configuration of one generator run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Directory scanned for models.
    pub input_dir: PathBuf,
    /// Root of the sequence output tree.
    pub output_root: PathBuf,
    /// Model file extension, matched case-insensitively.
    pub model_extension: String,
    /// Frames per sequence.
    pub frame_count: u32,
    /// Degrees between consecutive frames.
    pub angle_step_deg: f64,
    /// Output frame size.
    pub resolution: Resolution,
    /// Per-format encoder settings.
    pub encode: EncodeSettings,
    /// Frame-level resume rule.
    pub skip_policy: SkipPolicy,
    /// Write placeholder frames when rendering a frame fails.
    pub placeholder_on_render_failure: bool,
    /// Material presets to render.
    pub materials: MaterialTable,
    /// Renderer process settings.
    pub renderer: RendererSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(INPUT_DIR),
            output_root: PathBuf::from(OUTPUT_ROOT),
            model_extension: MODEL_EXTENSION.to_string(),
            frame_count: FRAME_COUNT,
            angle_step_deg: ANGLE_STEP_DEG,
            resolution: Resolution::square(FRAME_SIZE),
            encode: EncodeSettings::default(),
            skip_policy: SkipPolicy::default(),
            placeholder_on_render_failure: true,
            materials: MaterialTable::builtin(),
            renderer: RendererSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Same constants, rooted at different input/output directories.
    pub fn with_roots(
        mut self,
        input_dir: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        self.input_dir = input_dir.into();
        self.output_root = output_root.into();
        self
    }

    /// Check every invariant the generator relies on.
    pub fn validate(&self) -> TurntableResult<()> {
        if self.frame_count == 0 {
            return Err(TurntableError::validation("frame count must be non-zero"));
        }
        if !self.angle_step_deg.is_finite() || self.angle_step_deg <= 0.0 {
            return Err(TurntableError::validation(
                "angle step must be finite and > 0",
            ));
        }
        if self.model_extension.is_empty() || self.model_extension.contains('.') {
            return Err(TurntableError::validation(
                "model extension must be non-empty and given without a dot",
            ));
        }
        self.resolution.validate()?;
        self.encode.validate()?;
        self.materials.validate()?;
        Ok(())
    }

    /// Frame indices of one sequence, in render order.
    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> + use<> {
        (0..self.frame_count).map(FrameIndex)
    }

    /// Rotation angle for `frame`, in degrees.
    pub fn angle_for(&self, frame: FrameIndex) -> f64 {
        frame.angle_deg(self.angle_step_deg)
    }

    /// Output directory of one (model, material) sequence.
    pub fn sequence_dir(&self, model: &str, material: &str) -> PathBuf {
        sequence_dir(&self.output_root, model, material)
    }

    /// Expected path of a model file given its identifier.
    ///
    /// Identifiers may be given with or without the model extension.
    pub fn model_path(&self, model_id: &str) -> PathBuf {
        model_path_in(&self.input_dir, model_id, &self.model_extension)
    }
}

fn model_path_in(dir: &Path, model_id: &str, ext: &str) -> PathBuf {
    let suffix = format!(".{ext}");
    let has_ext = model_id.len() > suffix.len()
        && model_id
            .get(model_id.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix));
    if has_ext {
        dir.join(model_id)
    } else {
        dir.join(format!("{model_id}{suffix}"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
