use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatehouse_core::{CoreError, PrincipalId};

use crate::claims::{Claim, claim_types};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("missing required claim '{0}'")]
    Missing(String),

    #[error("invalid subject claim: {0}")]
    InvalidSubject(#[source] CoreError),
}

/// An authenticated principal and the claims it carries.
///
/// Construction is decoupled from token decoding: transports build this from
/// whatever identity model they verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    pub principal_id: PrincipalId,
    pub claims: Vec<Claim>,
}

impl ClaimsPrincipal {
    pub fn new(principal_id: PrincipalId, claims: Vec<Claim>) -> Self {
        Self { principal_id, claims }
    }

    /// Build a principal whose id comes from its `sub` claim.
    pub fn from_claims(claims: Vec<Claim>) -> Result<Self, ClaimError> {
        let subject = claims
            .iter()
            .find(|c| c.is_kind(claim_types::SUB))
            .ok_or_else(|| ClaimError::Missing(claim_types::SUB.to_string()))?;
        let principal_id = subject.value().parse().map_err(ClaimError::InvalidSubject)?;
        Ok(Self::new(principal_id, claims))
    }

    pub fn find_first(&self, kind: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.is_kind(kind))
    }

    pub fn find_all<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Claim> + 'a {
        self.claims.iter().filter(move |c| c.is_kind(kind))
    }

    pub fn value_of(&self, kind: &str) -> Option<&str> {
        self.find_first(kind).map(Claim::value)
    }

    pub fn has_claim(&self, kind: &str, value: &str) -> bool {
        self.find_all(kind).any(|c| c.value() == value)
    }

    /// Value of the first claim of `kind`, or an error naming the claim.
    pub fn require(&self, kind: &str) -> Result<&str, ClaimError> {
        self.value_of(kind)
            .ok_or_else(|| ClaimError::Missing(kind.to_string()))
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.find_all(claim_types::ROLE).map(Claim::value)
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.has_claim(claim_types::ROLE, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(kind: &'static str, value: &str) -> Claim {
        Claim::new(kind, value).unwrap()
    }

    fn alice() -> ClaimsPrincipal {
        ClaimsPrincipal::new(
            PrincipalId::new(),
            vec![
                claim(claim_types::NAME, "alice"),
                claim("ROLE", "teller"),
                claim(claim_types::ROLE, "auditor"),
            ],
        )
    }

    #[test]
    fn lookups() {
        let principal = alice();
        assert_eq!(principal.value_of(claim_types::NAME), Some("alice"));
        assert_eq!(principal.value_of(claim_types::EMAIL), None);
        assert_eq!(principal.roles().collect::<Vec<_>>(), vec!["teller", "auditor"]);
        assert!(principal.is_in_role("auditor"));
        assert!(!principal.is_in_role("Auditor"));
        assert_eq!(principal.find_all(claim_types::ROLE).count(), 2);
    }

    #[test]
    fn require_names_the_missing_claim() {
        let err = alice().require(claim_types::EMAIL).unwrap_err();
        assert_eq!(err, ClaimError::Missing("email".to_string()));
        assert_eq!(err.to_string(), "missing required claim 'email'");
    }

    #[test]
    fn from_claims_uses_subject() {
        let id = PrincipalId::new();
        let principal =
            ClaimsPrincipal::from_claims(vec![claim(claim_types::SUB, &id.to_string())]).unwrap();
        assert_eq!(principal.principal_id, id);

        let err = ClaimsPrincipal::from_claims(vec![claim(claim_types::SUB, "nope")]).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidSubject(CoreError::InvalidId(_))));

        let err = ClaimsPrincipal::from_claims(vec![]).unwrap_err();
        assert_eq!(err, ClaimError::Missing("sub".to_string()));
    }
}
