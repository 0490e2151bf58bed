/// Convenience result type used across Scrollscape.
pub type ScrollscapeResult<T> = Result<T, ScrollscapeError>;

/// Top-level error taxonomy used by construction-time APIs.
///
/// Runtime degradation (a frame that failed to decode, a missing surface, an out-of-range frame
/// index, events delivered after teardown) is never reported through this type; those paths are
/// logged and become no-ops.
#[derive(thiserror::Error, Debug)]
pub enum ScrollscapeError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while discovering or reading frame assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while allocating or writing a render surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollscapeError {
    /// Build a [`ScrollscapeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollscapeError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrollscapeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrollscapeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
