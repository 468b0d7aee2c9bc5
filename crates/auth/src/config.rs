//! Engine configuration.
//!
//! Defaults match the plain contract: rules are awaited one after another and
//! nothing is timed out. Both knobs can be overridden from the environment.

use core::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the engine drives rule evaluations within one call.
///
/// Either way every rule runs and denials are reported in registry order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Await each rule before starting the next.
    #[default]
    Sequential,
    /// Poll every rule future together.
    Concurrent,
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            _ => Err("expected `sequential` or `concurrent`".to_string()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizerConfig {
    pub evaluation: EvaluationMode,

    /// Upper bound for a single rule evaluation. `None` lets a hanging rule
    /// hang the whole call.
    ///
    /// Requires a Tokio runtime with the time driver enabled.
    pub rule_timeout: Option<Duration>,
}

impl AuthorizerConfig {
    pub const EVALUATION_VAR: &'static str = "GATEHOUSE_EVALUATION";
    pub const RULE_TIMEOUT_VAR: &'static str = "GATEHOUSE_RULE_TIMEOUT_MS";

    pub fn with_evaluation(mut self, evaluation: EvaluationMode) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_rule_timeout(mut self, timeout: Duration) -> Self {
        self.rule_timeout = Some(timeout);
        self
    }

    /// Read overrides from the process environment.
    ///
    /// - `GATEHOUSE_EVALUATION`: `sequential` | `concurrent`
    /// - `GATEHOUSE_RULE_TIMEOUT_MS`: milliseconds, `0` disables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::EVALUATION_VAR) {
            config.evaluation = value.parse().map_err(|reason| ConfigError::InvalidValue {
                var: Self::EVALUATION_VAR,
                value: value.clone(),
                reason,
            })?;
        }

        if let Some(value) = lookup(Self::RULE_TIMEOUT_VAR) {
            let millis: u64 = value.trim().parse().map_err(|e: core::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: Self::RULE_TIMEOUT_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.rule_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }
}
