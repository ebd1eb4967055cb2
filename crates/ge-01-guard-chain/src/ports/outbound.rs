//! Outbound Ports (Driven Ports)
//!
//! The authorization collaborator: a predicate over the operation context
//! returning allow/deny plus a reason.

use crate::domain::GuardDecision;
use async_trait::async_trait;
use shared_types::OperationContext;

/// One authorization check.
///
/// Implementations must not mutate domain state and must not wait on event
/// delivery; they may consult external authorization services.
#[async_trait]
pub trait Guard: Send + Sync {
    /// Stable name used in denial reports and logs.
    fn name(&self) -> &str;

    /// Evaluate the check for one invocation.
    async fn check(&self, ctx: &OperationContext) -> GuardDecision;
}
