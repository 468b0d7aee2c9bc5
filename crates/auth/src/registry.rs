//! Type-keyed rule registry.
//!
//! The registry is populated once at startup through [`RuleRegistryBuilder`]
//! and is immutable afterwards, so the engine reads it without locking.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use gatehouse_core::AuthorizationResult;

use crate::rule::{AuthorizationRule, FnRule};

/// Shared handle to a registered rule.
pub type RuleHandle<T> = Arc<dyn AuthorizationRule<T>>;

/// Where the engine discovers rules for a request type.
///
/// Returning an empty list is valid and means "no rules apply". The order of
/// the returned list is the evaluation order the engine reports denials in.
pub trait RuleSource: Send + Sync {
    fn resolve_rules<T>(&self) -> Vec<RuleHandle<T>>
    where
        T: Sync + 'static;
}

impl<S> RuleSource for Arc<S>
where
    S: RuleSource + ?Sized,
{
    fn resolve_rules<T>(&self) -> Vec<RuleHandle<T>>
    where
        T: Sync + 'static,
    {
        (**self).resolve_rules::<T>()
    }
}

impl<S> RuleSource for &S
where
    S: RuleSource + ?Sized,
{
    fn resolve_rules<T>(&self) -> Vec<RuleHandle<T>>
    where
        T: Sync + 'static,
    {
        (**self).resolve_rules::<T>()
    }
}

/// Rules for one request type, type-erased so the map can hold every `T`.
///
/// `rules` always holds a `Vec<RuleHandle<T>>` for the `T` whose `TypeId` keys
/// this entry.
struct RuleSet {
    request_type: &'static str,
    len: usize,
    rules: Box<dyn Any + Send + Sync>,
}

impl RuleSet {
    fn new<T: Sync + 'static>() -> Self {
        Self {
            request_type: std::any::type_name::<T>(),
            len: 0,
            rules: Box::new(Vec::<RuleHandle<T>>::new()),
        }
    }

    fn typed<T: Sync + 'static>(&self) -> Option<&Vec<RuleHandle<T>>> {
        self.rules.downcast_ref::<Vec<RuleHandle<T>>>()
    }

    fn push<T: Sync + 'static>(&mut self, rule: RuleHandle<T>) {
        if let Some(rules) = self.rules.downcast_mut::<Vec<RuleHandle<T>>>() {
            rules.push(rule);
            self.len = rules.len();
        }
    }
}

/// Immutable map from request type to its rules, in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    sets: HashMap<TypeId, RuleSet>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// A registry with no rules; every request is allowed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rules registered for `T`.
    pub fn rule_count<T: Sync + 'static>(&self) -> usize {
        self.sets.get(&TypeId::of::<T>()).map_or(0, |set| set.len)
    }

    /// Total number of registered rules across all request types.
    pub fn len(&self) -> usize {
        self.sets.values().map(|set| set.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the request types that have at least one rule, sorted.
    pub fn request_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.sets.values().map(|set| set.request_type).collect();
        names.sort_unstable();
        names
    }
}

impl RuleSource for RuleRegistry {
    fn resolve_rules<T>(&self) -> Vec<RuleHandle<T>>
    where
        T: Sync + 'static,
    {
        self.sets
            .get(&TypeId::of::<T>())
            .and_then(RuleSet::typed::<T>)
            .cloned()
            .unwrap_or_default()
    }
}

impl core::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for set in self.sets.values() {
            map.entry(&set.request_type, &set.len);
        }
        map.finish()
    }
}

/// Composition-time builder for [`RuleRegistry`].
///
/// Registration order is preserved per request type and becomes the
/// evaluation (and denial-reporting) order.
#[derive(Default)]
pub struct RuleRegistryBuilder {
    sets: HashMap<TypeId, RuleSet>,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for requests of type `T`.
    pub fn register<T, R>(self, rule: R) -> Self
    where
        T: Sync + 'static,
        R: AuthorizationRule<T> + 'static,
    {
        self.register_arc::<T>(Arc::new(rule))
    }

    /// Register an already shared rule (e.g. one instance serving several
    /// registries).
    pub fn register_arc<T>(mut self, rule: RuleHandle<T>) -> Self
    where
        T: Sync + 'static,
    {
        self.sets
            .entry(TypeId::of::<T>())
            .or_insert_with(RuleSet::new::<T>)
            .push(rule);
        self
    }

    /// Register a synchronous closure as a named rule.
    pub fn register_fn<T, F>(self, name: &'static str, check: F) -> Self
    where
        T: Sync + 'static,
        F: Fn(&T) -> AuthorizationResult + Send + Sync + 'static,
    {
        self.register::<T, _>(FnRule::new(name, check))
    }

    pub fn build(self) -> RuleRegistry {
        let registry = RuleRegistry { sets: self.sets };
        tracing::debug!(
            request_types = registry.sets.len(),
            rules = registry.len(),
            "rule registry built"
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Withdraw;
    struct Deposit;

    // Structurally identical to `Withdraw` but a different type.
    struct Transfer;

    fn names<T: Sync + 'static>(registry: &RuleRegistry) -> Vec<String> {
        registry
            .resolve_rules::<T>()
            .iter()
            .map(|rule| rule.name().to_string())
            .collect()
    }

    #[test]
    fn unknown_type_resolves_to_no_rules() {
        let registry = RuleRegistry::empty();
        assert!(registry.resolve_rules::<Withdraw>().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn keeps_registration_order_per_type() {
        let registry = RuleRegistry::builder()
            .register_fn("balance", |_: &Withdraw| AuthorizationResult::success())
            .register_fn("deposit-cap", |_: &Deposit| AuthorizationResult::success())
            .register_fn("fraud", |_: &Withdraw| AuthorizationResult::success())
            .build();

        assert_eq!(names::<Withdraw>(&registry), vec!["balance", "fraud"]);
        assert_eq!(names::<Deposit>(&registry), vec!["deposit-cap"]);
        assert_eq!(registry.rule_count::<Withdraw>(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn keying_is_nominal() {
        let registry = RuleRegistry::builder()
            .register_fn("balance", |_: &Withdraw| AuthorizationResult::success())
            .build();

        assert!(registry.resolve_rules::<Transfer>().is_empty());
        assert_eq!(registry.rule_count::<Transfer>(), 0);
    }

    #[test]
    fn shared_handles_resolve_through_arc() {
        let rule: RuleHandle<Withdraw> =
            Arc::new(FnRule::new("shared", |_: &Withdraw| AuthorizationResult::success()));
        let registry = Arc::new(RuleRegistry::builder().register_arc(rule.clone()).build());

        let resolved = registry.resolve_rules::<Withdraw>();
        assert_eq!(resolved.len(), 1);
        assert!(Arc::ptr_eq(&resolved[0], &rule));
    }

    #[test]
    fn lists_request_types() {
        let registry = RuleRegistry::builder()
            .register_fn("a", |_: &Withdraw| AuthorizationResult::success())
            .register_fn("b", |_: &Deposit| AuthorizationResult::success())
            .build();

        let types = registry.request_types();
        assert_eq!(types.len(), 2);
        assert!(types.iter().any(|t| t.ends_with("Withdraw")));
        assert!(types.iter().any(|t| t.ends_with("Deposit")));
    }
}
