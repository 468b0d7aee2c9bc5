//! `gatehouse-auth` — pluggable, type-keyed authorization rules.
//!
//! Rules are registered per request type at startup; the [`Authorizer`]
//! resolves them at call time, evaluates all of them and collapses their
//! verdicts into an [`AuthorizationOutcome`].
//!
//! ```ignore
//! let registry = RuleRegistry::builder()
//!     .register::<Withdraw, _>(BalanceRule::new(ledger))
//!     .register::<Withdraw, _>(FraudRule::new(scores))
//!     .build();
//! let authorizer = Authorizer::new(registry);
//!
//! match authorizer.authorize(&Withdraw { amount: 500 }).await? {
//!     AuthorizationOutcome::Allowed => proceed(),
//!     AuthorizationOutcome::Denied(reason) => reject(&[reason]),
//!     AuthorizationOutcome::DeniedMultiple(reasons) => reject(&reasons),
//! }
//! ```
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod config;
pub mod explain;
pub mod password;
pub mod principal;
pub mod registry;
pub mod rule;

pub use authorize::{AuthorizeError, AuthorizeResult, Authorizer};
pub use claims::{Claim, claim_types};
pub use config::{AuthorizerConfig, ConfigError, EvaluationMode};
pub use explain::{AuthorizationExplanation, RuleVerdict};
pub use password::{PasswordError, PasswordOptions, generate_password, generate_random_password};
pub use principal::{ClaimError, ClaimsPrincipal};
pub use registry::{RuleHandle, RuleRegistry, RuleRegistryBuilder, RuleSource};
pub use rule::{AuthorizationRule, FnRule, RuleError};

pub use gatehouse_core::{AuthorizationDenied, AuthorizationOutcome, AuthorizationResult};
