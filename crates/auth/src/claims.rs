use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use gatehouse_core::{CoreError, CoreResult};

/// Well-known claim types.
pub mod claim_types {
    pub const SUB: &str = "sub";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const TENANT: &str = "tenant_id";
    pub const PERMISSION: &str = "permission";
}

/// A single `(type, value)` statement about a principal.
///
/// Claim types compare ASCII case-insensitively (`"Role"` and `"role"` are the
/// same type); values compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    kind: Cow<'static, str>,
    value: String,
}

impl Claim {
    pub fn new(kind: impl Into<Cow<'static, str>>, value: impl Into<String>) -> CoreResult<Self> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(CoreError::validation("claim type must not be empty"));
        }
        Ok(Self {
            kind,
            value: value.into(),
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

impl core::fmt::Display for Claim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}", self.kind, self.value)
    }
}
