/// Convenience result type used across the tactic board.
pub type TacticResult<T> = Result<T, TacticError>;

/// Top-level error taxonomy used by board, timeline, codec and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum TacticError {
    /// Invalid user-provided data or an operation that is not allowed in the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed share or save payload.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoder unavailable, render failure, encode failure or a cancelled export.
    #[error("export error: {0}")]
    Export(String),

    /// Key-value storage failures for saved tactics.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TacticError {
    /// Build a [`TacticError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TacticError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TacticError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`TacticError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`TacticError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that callers recover from by falling back to a default state.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
