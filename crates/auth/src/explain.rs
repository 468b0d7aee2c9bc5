//! Per-rule audit trail of an authorization decision.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gatehouse_core::{AuthorizationOutcome, AuthorizationResult};

/// One rule's verdict, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    pub rule: String,
    pub successful: bool,
    pub message: Option<String>,
}

impl RuleVerdict {
    pub fn new(rule: impl Into<String>, result: AuthorizationResult) -> Self {
        let successful = result.is_successful();
        Self {
            rule: rule.into(),
            successful,
            message: result.into_message(),
        }
    }

    /// The reason this verdict contributes to a denial, if it is one.
    ///
    /// The rule's message is reported as given. A failing rule without a
    /// message still yields a reason naming the rule, so no denial is ever
    /// reported without one.
    pub fn denial_reason(&self) -> Option<String> {
        if self.successful {
            return None;
        }
        Some(match &self.message {
            Some(message) => message.clone(),
            None => format!("denied by {}", self.rule),
        })
    }
}

/// Collapse verdicts (in evaluation order) into the caller-facing outcome.
pub(crate) fn aggregate(verdicts: &[RuleVerdict]) -> AuthorizationOutcome {
    let reasons = verdicts.iter().filter_map(RuleVerdict::denial_reason).collect();
    AuthorizationOutcome::from_denials(reasons)
}

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this request allowed/denied?": which rules ran, in which
/// order, and what each one said.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// Type name of the request that was checked.
    pub request_type: &'static str,

    /// Verdicts in evaluation order.
    pub verdicts: Vec<RuleVerdict>,

    pub outcome: AuthorizationOutcome,

    pub evaluated_at: DateTime<Utc>,
}

impl AuthorizationExplanation {
    pub(crate) fn new(request_type: &'static str, verdicts: Vec<RuleVerdict>) -> Self {
        let outcome = aggregate(&verdicts);
        Self {
            request_type,
            verdicts,
            outcome,
            evaluated_at: Utc::now(),
        }
    }

    /// Verdicts of the rules that denied the request.
    pub fn failed(&self) -> impl Iterator<Item = &RuleVerdict> {
        self.verdicts.iter().filter(|v| !v.successful)
    }
}
