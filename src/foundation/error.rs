/// Convenience result type used across turntable.
pub type TurntableResult<T> = Result<T, TurntableError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// The variants map onto the isolation levels of the generator: only
/// [`TurntableError::BackendUnavailable`] aborts a batch run, session errors abandon one
/// (model, material) pair, render errors abandon one frame and encode errors one format.
#[derive(thiserror::Error, Debug)]
pub enum TurntableError {
    /// Invalid configuration or user-provided input (unknown material, missing model file).
    #[error("validation error: {0}")]
    Validation(String),

    /// The renderer process could not be launched at all.
    #[error("render backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Opening, configuring or closing one render session failed.
    #[error("session error: {0}")]
    Session(String),

    /// Rendering a single frame failed.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or writing a single output format failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing bridge messages.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TurntableError {
    /// Build a [`TurntableError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TurntableError::BackendUnavailable`] value.
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Build a [`TurntableError::Session`] value.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Build a [`TurntableError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TurntableError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TurntableError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that must terminate the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    /// Return `true` for errors after which the current render session cannot be used.
    ///
    /// Frames not yet attempted are left missing so a later run can render them.
    pub fn ends_sequence(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::Session(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
