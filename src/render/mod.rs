/// Backend trait, frame type and scoped sessions.
pub mod backend;
/// External renderer process backend.
pub mod bridge;
