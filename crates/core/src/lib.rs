//! `gatehouse-core` — authorization value types shared across the workspace.
//!
//! This crate contains **pure** primitives (no async, no IO): rule verdicts,
//! aggregated outcomes and identifiers. The engine lives in `gatehouse-auth`.

pub mod error;
pub mod id;
pub mod outcome;
pub mod result;

pub use error::{CoreError, CoreResult};
pub use id::PrincipalId;
pub use outcome::{AuthorizationDenied, AuthorizationOutcome};
pub use result::AuthorizationResult;
