//! Turntable renders 360° product image sequences from binary glTF models.
//!
//! Every (model, material preset) pair becomes one directory of evenly spaced rotation frames,
//! each written as AVIF, WebP and PNG. Runs are resumable: frames already on disk are never
//! rendered again, and a failing frame or model never stops the rest of the batch.
//!
//! - Build a [`PipelineConfig`] (the defaults are the production constants)
//! - Pick a [`RenderBackend`], usually the external-process [`BridgeBackend`]
//! - Call [`generate_all`] or [`generate_single`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod config;
pub mod encode;
pub mod generate;
pub mod material;
pub mod model;
/// Rendering backends.
pub mod render;
pub mod scene;

pub use crate::foundation::core::{
    FrameIndex, OutputFormat, Resolution, frame_file_name, sequence_dir_name,
};
pub use crate::foundation::error::{TurntableError, TurntableResult};

pub use crate::config::{EncodeSettings, PipelineConfig, RendererSettings, SkipPolicy};
pub use crate::encode::frame::{FormatOutcome, FrameEncodeReport, FrameEncoder};
pub use crate::generate::batch::generate_all;
pub use crate::generate::progress::{
    BatchReport, FailedSequence, FrameOutcome, FrameProgress, NoProgress, ProgressObserver,
    SequenceReport,
};
pub use crate::generate::sequence::{frame_is_done, generate_sequence, generate_single};
pub use crate::material::{MaterialPreset, MaterialTable};
pub use crate::model::ModelAsset;
pub use crate::render::backend::{FrameRGBA, RenderBackend, SequenceSession};
pub use crate::render::bridge::{BridgeBackend, BridgeOpts};
pub use crate::scene::SceneRecipe;
