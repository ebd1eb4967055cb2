//! Dispatcher configuration.

use ge_01_guard_chain::OperationTier;
use serde::{Deserialize, Serialize};

/// Global access policy applied before per-operation guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Tier required for every query.
    pub query_tier: OperationTier,
    /// Tier required for every mutation.
    pub mutation_tier: OperationTier,
    /// Tier required for every subscription.
    pub subscription_tier: OperationTier,
    /// API key for protected/admin tiers (None = local callers only).
    pub api_key: Option<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            query_tier: OperationTier::Public,
            mutation_tier: OperationTier::Public,
            subscription_tier: OperationTier::Public,
            api_key: None,
        }
    }
}

impl DispatcherConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().is_some_and(str::is_empty) {
            return Err("api_key cannot be empty".into());
        }
        Ok(())
    }
}
