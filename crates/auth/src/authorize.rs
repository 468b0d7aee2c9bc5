//! The authorization engine.
//!
//! ```text
//! authorize(request)
//!   ↓
//! 1. Discover rules registered for the request's type
//!   ↓
//! 2. Evaluate every rule (no short-circuit on denial)
//!   ↓
//! 3. Aggregate: 0 failures → Allowed, 1 → Denied, ≥2 → DeniedMultiple
//! ```
//!
//! Denials are ordinary return values. `AuthorizeError` is reserved for a
//! missing request and for rules that could not produce a verdict.

use std::any::type_name;
use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;

use gatehouse_core::AuthorizationOutcome;

use crate::config::{AuthorizerConfig, EvaluationMode};
use crate::explain::{AuthorizationExplanation, RuleVerdict, aggregate};
use crate::registry::RuleSource;
use crate::rule::{AuthorizationRule, RuleError};

pub type AuthorizeResult<T> = Result<T, AuthorizeError>;

#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// No request was supplied; no rule was evaluated.
    #[error("missing authorization request of type `{request_type}`")]
    MissingRequest { request_type: &'static str },

    /// A rule exceeded the configured per-rule timeout.
    #[error("authorization rule `{rule}` did not finish within {timeout:?}")]
    RuleTimedOut { rule: String, timeout: Duration },

    /// A rule failed to evaluate. The rule's own error, untouched.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Evaluates every rule registered for a request type and aggregates the
/// verdicts.
///
/// Holds no per-call state; share it behind an `Arc` and call it from as many
/// tasks as needed.
#[derive(Debug)]
pub struct Authorizer<S> {
    source: S,
    config: AuthorizerConfig,
}

impl<S> Authorizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, AuthorizerConfig::default())
    }

    pub fn with_config(source: S, config: AuthorizerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AuthorizerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S> Authorizer<S>
where
    S: RuleSource,
{
    /// Authorize `request` against every rule registered for `T`.
    pub async fn authorize<T>(&self, request: &T) -> AuthorizeResult<AuthorizationOutcome>
    where
        T: Sync + 'static,
    {
        self.try_authorize(Some(request)).await
    }

    /// Like [`authorize`](Self::authorize), for callers whose request may be
    /// absent. `None` fails with [`AuthorizeError::MissingRequest`] before any
    /// rule is resolved or evaluated.
    pub async fn try_authorize<T>(&self, request: Option<&T>) -> AuthorizeResult<AuthorizationOutcome>
    where
        T: Sync + 'static,
    {
        let verdicts = self.evaluate(request).await?;
        let outcome = aggregate(&verdicts);
        trace_outcome::<T>(&outcome);
        Ok(outcome)
    }

    /// Authorize `request` and keep every rule's verdict for auditing.
    ///
    /// `explanation.outcome` is exactly what [`authorize`](Self::authorize)
    /// would have returned for the same verdicts.
    pub async fn authorize_explained<T>(&self, request: &T) -> AuthorizeResult<AuthorizationExplanation>
    where
        T: Sync + 'static,
    {
        let verdicts = self.evaluate(Some(request)).await?;
        let explanation = AuthorizationExplanation::new(type_name::<T>(), verdicts);
        trace_outcome::<T>(&explanation.outcome);
        Ok(explanation)
    }

    /// Discovery + evaluation. Verdicts come back in registry order whatever
    /// the evaluation mode; the first malfunction aborts the call.
    ///
    /// "First" means first in registry order for `Sequential`, and first to
    /// complete for `Concurrent`: when several rules malfunction concurrently,
    /// the error returned is whichever resolves earliest, and the remaining
    /// rule futures are dropped.
    async fn evaluate<T>(&self, request: Option<&T>) -> AuthorizeResult<Vec<RuleVerdict>>
    where
        T: Sync + 'static,
    {
        let request_type = type_name::<T>();
        let Some(request) = request else {
            return Err(AuthorizeError::MissingRequest { request_type });
        };

        let rules = self.source.resolve_rules::<T>();
        if rules.is_empty() {
            return Ok(Vec::new());
        }

        let span = tracing::debug_span!(
            "authorize",
            request_type,
            rules = rules.len(),
            mode = ?self.config.evaluation
        );

        async {
            match self.config.evaluation {
                EvaluationMode::Sequential => {
                    let mut verdicts = Vec::with_capacity(rules.len());
                    for rule in &rules {
                        verdicts.push(self.evaluate_rule(rule.as_ref(), request).await?);
                    }
                    Ok::<_, AuthorizeError>(verdicts)
                }
                EvaluationMode::Concurrent => {
                    futures::future::try_join_all(
                        rules.iter().map(|rule| self.evaluate_rule(rule.as_ref(), request)),
                    )
                    .await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn evaluate_rule<T>(
        &self,
        rule: &dyn AuthorizationRule<T>,
        request: &T,
    ) -> AuthorizeResult<RuleVerdict>
    where
        T: Sync + 'static,
    {
        let evaluation = rule.evaluate(request);
        let result = match self.config.rule_timeout {
            Some(timeout) => tokio::time::timeout(timeout, evaluation)
                .await
                .map_err(|_| AuthorizeError::RuleTimedOut {
                    rule: rule.name().to_string(),
                    timeout,
                })??,
            None => evaluation.await?,
        };

        Ok(RuleVerdict::new(rule.name(), result))
    }
}

fn trace_outcome<T>(outcome: &AuthorizationOutcome) {
    tracing::debug!(
        request_type = type_name::<T>(),
        outcome = outcome.kind(),
        denials = outcome.reasons().len(),
        "authorization evaluated"
    );
}
