//! Core error model.

use thiserror::Error;

/// Result type used by the core value types.
pub type CoreResult<T> = Result<T, CoreError>;

/// Deterministic failures raised while constructing core values.
///
/// Denials are *not* errors; see [`crate::AuthorizationOutcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. an empty claim type).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
