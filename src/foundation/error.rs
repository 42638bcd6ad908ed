/// Convenience result type used across reelkit.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy.
///
/// `Resource` errors are normally recovered where they happen (a clip is skipped, music is
/// dropped); everything else surfaces to the batch loop and fails the current row only.
/// `Input` stops the whole run before any row is processed.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Unusable row or configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// A footage, audio or image resource could not be opened.
    #[error("resource error: {0}")]
    Resource(String),

    /// The encoding backend failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The batch input table is missing or unreadable.
    #[error("input error: {0}")]
    Input(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
