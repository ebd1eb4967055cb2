//! Guards over the caller identity.

use crate::domain::GuardDecision;
use crate::ports::Guard;
use async_trait::async_trait;
use shared_types::OperationContext;
use std::fmt;

/// Allows only callers with an authenticated subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatedGuard;

#[async_trait]
impl Guard for AuthenticatedGuard {
    fn name(&self) -> &str {
        "authenticated"
    }

    async fn check(&self, ctx: &OperationContext) -> GuardDecision {
        GuardDecision::from_bool(
            ctx.caller.is_authenticated(),
            "authentication required",
        )
    }
}

/// Allows only callers holding a role.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    name: String,
    role: String,
}

impl RoleGuard {
    pub fn new(role: impl Into<String>) -> Self {
        let role = role.into();
        Self {
            name: format!("role:{}", role),
            role,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

#[async_trait]
impl Guard for RoleGuard {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, ctx: &OperationContext) -> GuardDecision {
        GuardDecision::from_bool(
            ctx.caller.has_role(&self.role),
            format!("role '{}' required", self.role),
        )
    }
}

type Predicate = dyn Fn(&OperationContext) -> bool + Send + Sync;

/// Guard backed by a closure.
pub struct PredicateGuard {
    name: String,
    reason: String,
    predicate: Box<Predicate>,
}

impl PredicateGuard {
    pub fn new<F>(name: impl Into<String>, reason: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&OperationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reason: reason.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Guard that always allows.
    pub fn allow_all(name: impl Into<String>) -> Self {
        Self::new(name, "", |_| true)
    }

    /// Guard that always denies with `reason`.
    pub fn deny_all(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(name, reason, |_| false)
    }
}

#[async_trait]
impl Guard for PredicateGuard {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, ctx: &OperationContext) -> GuardDecision {
        GuardDecision::from_bool((self.predicate)(ctx), self.reason.clone())
    }
}

impl fmt::Debug for PredicateGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateGuard")
            .field("name", &self.name)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}
