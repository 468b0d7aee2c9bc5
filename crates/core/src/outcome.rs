//! Aggregated outcome of evaluating every rule for one request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the engine concluded for one request.
///
/// - `Allowed`: no rule failed (including the case where no rule is registered)
/// - `Denied`: exactly one rule failed; carries that rule's reason
/// - `DeniedMultiple`: two or more rules failed; carries every reason in
///   evaluation order
///
/// Callers that only care about allow/deny use [`is_allowed`](Self::is_allowed);
/// callers that branch on "one reason vs many" match on the variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    Allowed,
    Denied(String),
    DeniedMultiple(Vec<String>),
}

impl AuthorizationOutcome {
    /// Collapse failure reasons (already in evaluation order) into an outcome.
    pub fn from_denials(mut reasons: Vec<String>) -> Self {
        match reasons.len() {
            0 => Self::Allowed,
            1 => Self::Denied(reasons.remove(0)),
            _ => Self::DeniedMultiple(reasons),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// Denial reasons in evaluation order (empty when allowed).
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Allowed => &[],
            Self::Denied(reason) => core::slice::from_ref(reason),
            Self::DeniedMultiple(reasons) => reasons,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied(_) => "denied",
            Self::DeniedMultiple(_) => "denied_multiple",
        }
    }

    /// Turn a denial into an error, for boundaries that propagate with `?`.
    pub fn into_result(self) -> Result<(), AuthorizationDenied> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(AuthorizationDenied::Single(reason)),
            Self::DeniedMultiple(reasons) => Err(AuthorizationDenied::Multiple(reasons)),
        }
    }
}

/// Error form of a denial (see [`AuthorizationOutcome::into_result`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorizationDenied {
    #[error("authorization denied: {0}")]
    Single(String),

    #[error("authorization denied ({} reasons): {}", .0.len(), .0.join("; "))]
    Multiple(Vec<String>),
}

impl AuthorizationDenied {
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Single(reason) => core::slice::from_ref(reason),
            Self::Multiple(reasons) => reasons,
        }
    }
}
