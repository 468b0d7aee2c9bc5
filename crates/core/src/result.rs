//! A single rule's verdict.

use serde::{Deserialize, Serialize};

/// The verdict produced by one authorization rule.
///
/// A rule expresses its normal denial path by returning a result with
/// `successful == false`; it never uses an error for that. The optional
/// message is the human-readable reason surfaced to callers when the engine
/// aggregates denials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    successful: bool,
    message: Option<String>,
}

impl AuthorizationResult {
    pub fn new(successful: bool, message: Option<String>) -> Self {
        Self { successful, message }
    }

    /// A passing verdict with no message.
    pub fn success() -> Self {
        Self::new(true, None)
    }

    /// A passing verdict carrying an informational message.
    pub fn success_with(message: impl Into<String>) -> Self {
        Self::new(true, Some(message.into()))
    }

    /// A denial with its reason.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, Some(message.into()))
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn into_message(self) -> Option<String> {
        self.message
    }
}

impl From<bool> for AuthorizationResult {
    fn from(successful: bool) -> Self {
        Self::new(successful, None)
    }
}
