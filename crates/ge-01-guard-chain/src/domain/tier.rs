//! Operation access tiers.
//!
//! Tier 1: Public (No Auth) - read operations
//! Tier 2: Protected (API Key / Local) - writes and live subscriptions
//! Tier 3: Admin (Local + API Key) - management operations

use serde::{Deserialize, Serialize};

/// Operation access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationTier {
    /// Public - no authentication required
    Public,
    /// Protected - requires API key OR local caller
    Protected,
    /// Admin - requires local caller AND API key (when one is configured)
    Admin,
}

impl OperationTier {
    /// Check if tier requires authentication
    pub fn requires_auth(&self) -> bool {
        matches!(self, OperationTier::Protected | OperationTier::Admin)
    }

    /// Check if tier requires a local caller
    pub fn requires_local(&self) -> bool {
        matches!(self, OperationTier::Admin)
    }
}
