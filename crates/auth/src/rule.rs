//! The extension point: rules keyed by the request type they accept.

use std::borrow::Cow;

use async_trait::async_trait;

use gatehouse_core::AuthorizationResult;

/// Error raised by a rule that could not reach a verdict at all
/// (e.g. its policy backend is unreachable).
///
/// Opaque to the engine: it is never inspected and reaches the caller
/// unchanged.
pub type RuleError = anyhow::Error;

/// A predicate over one request type.
///
/// Rules are registered against exactly one `T` (keyed by `TypeId`, so two
/// structurally identical request types never share rules). A denial is a
/// normal return of `Ok(AuthorizationResult::failure(..))`; `Err` is reserved
/// for malfunctions.
///
/// Implement with `#[async_trait]`:
///
/// ```ignore
/// struct BalanceRule { ledger: Arc<Ledger> }
///
/// #[async_trait]
/// impl AuthorizationRule<Withdraw> for BalanceRule {
///     async fn evaluate(&self, req: &Withdraw) -> Result<AuthorizationResult, RuleError> {
///         let balance = self.ledger.balance(req.account).await?;
///         Ok(if balance >= req.amount {
///             AuthorizationResult::success()
///         } else {
///             AuthorizationResult::failure("insufficient funds")
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait AuthorizationRule<T>: Send + Sync
where
    T: Sync + 'static,
{
    /// Name used in explanations, timeout errors and fallback denial reasons.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn evaluate(&self, request: &T) -> Result<AuthorizationResult, RuleError>;
}

/// A rule backed by a synchronous closure.
///
/// Handy for small checks that need no IO; see
/// [`RuleRegistryBuilder::register_fn`](crate::RuleRegistryBuilder::register_fn).
pub struct FnRule<F> {
    name: Cow<'static, str>,
    check: F,
}

impl<F> FnRule<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> core::fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, F> AuthorizationRule<T> for FnRule<F>
where
    T: Sync + 'static,
    F: Fn(&T) -> AuthorizationResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, request: &T) -> Result<AuthorizationResult, RuleError> {
        Ok((self.check)(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Withdraw {
        amount: u64,
    }

    struct AlwaysAllow;

    #[async_trait]
    impl AuthorizationRule<Withdraw> for AlwaysAllow {
        async fn evaluate(&self, _request: &Withdraw) -> Result<AuthorizationResult, RuleError> {
            Ok(AuthorizationResult::success())
        }
    }

    #[test]
    fn default_name_is_the_type_name() {
        let rule = AlwaysAllow;
        let name = AuthorizationRule::<Withdraw>::name(&rule);
        assert!(name.ends_with("AlwaysAllow"), "unexpected name {name}");
    }

    #[tokio::test]
    async fn fn_rule_delegates_to_its_closure() {
        let rule = FnRule::new("limit", |req: &Withdraw| {
            if req.amount > 100 {
                AuthorizationResult::failure("over limit")
            } else {
                AuthorizationResult::success()
            }
        });

        assert_eq!(AuthorizationRule::<Withdraw>::name(&rule), "limit");
        let verdict = rule.evaluate(&Withdraw { amount: 500 }).await.unwrap();
        assert_eq!(verdict, AuthorizationResult::failure("over limit"));
        let verdict = rule.evaluate(&Withdraw { amount: 5 }).await.unwrap();
        assert!(verdict.is_successful());
    }
}
