//! Tier-based access guard.

use super::api_key::ApiKeyGuard;
use crate::domain::{GuardDecision, OperationTier};
use crate::ports::Guard;
use async_trait::async_trait;
use shared_types::{OperationContext, OperationKind};
use tracing::debug;

/// Enforces an [`OperationTier`] from the caller's API key and locality.
///
/// - Public: always allowed
/// - Protected: valid API key OR local caller
/// - Admin: local caller AND valid API key (key only checked when configured)
///
/// A scoped guard allows every operation outside its kind.
#[derive(Debug)]
pub struct OperationTierGuard {
    tier: OperationTier,
    api_key: Option<ApiKeyGuard>,
    scope: Option<OperationKind>,
}

impl OperationTierGuard {
    pub fn new(tier: OperationTier, api_key: Option<String>) -> Self {
        Self {
            tier,
            api_key: api_key.map(ApiKeyGuard::new),
            scope: None,
        }
    }

    /// Only enforce the tier for operations of `kind`.
    pub fn only_for(mut self, kind: OperationKind) -> Self {
        self.scope = Some(kind);
        self
    }

    pub fn tier(&self) -> OperationTier {
        self.tier
    }

    pub fn scope(&self) -> Option<OperationKind> {
        self.scope
    }
}

#[async_trait]
impl Guard for OperationTierGuard {
    fn name(&self) -> &str {
        match self.tier {
            OperationTier::Public => "tier:public",
            OperationTier::Protected => "tier:protected",
            OperationTier::Admin => "tier:admin",
        }
    }

    async fn check(&self, ctx: &OperationContext) -> GuardDecision {
        if self.scope.is_some_and(|kind| kind != ctx.kind) {
            return GuardDecision::allow();
        }

        let is_local = ctx.caller.local;
        let has_valid_key = self
            .api_key
            .as_ref()
            .is_some_and(|guard| guard.matches(ctx.caller.api_key.as_deref()));

        debug!(
            operation = %ctx.operation,
            tier = ?self.tier,
            is_local,
            has_valid_key,
            "Checking operation tier"
        );

        match self.tier {
            OperationTier::Public => GuardDecision::allow(),
            OperationTier::Protected => GuardDecision::from_bool(
                has_valid_key || is_local,
                "protected operation requires API key or local access",
            ),
            OperationTier::Admin => {
                if !is_local {
                    return GuardDecision::deny("admin operation requires local access");
                }
                if self.api_key.is_some() && !has_valid_key {
                    return GuardDecision::deny("admin operation requires API key");
                }
                GuardDecision::allow()
            }
        }
    }
}
