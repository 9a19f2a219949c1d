//! Multi-format frame encoding.
//!
//! Each rendered frame is written once per configured [`OutputFormat`](crate::OutputFormat) with
//! fixed quality settings. Formats are encoded and written independently.

/// Single-format byte encoders.
pub mod formats;
/// Per-frame writer with skip and placeholder handling.
pub mod frame;
