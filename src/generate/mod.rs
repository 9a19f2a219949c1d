//! Sequence generation.
//!
//! The generator walks frame indices in order, asks a [`RenderBackend`](crate::RenderBackend) for
//! each missing frame and hands the result to a [`FrameEncoder`](crate::FrameEncoder). It never
//! re-renders a frame that is already on disk and never lets one bad frame or one bad model stop
//! the rest of the run.

/// Whole-batch driver over every model and material.
pub mod batch;
/// Progress events and run reports.
pub mod progress;
/// Single-sequence driver.
pub mod sequence;

#[cfg(test)]
#[path = "../../tests/unit/generate/sequence.rs"]
mod tests;
