//! Guard chain evaluation.

use crate::domain::GuardDecision;
use crate::ports::Guard;
use shared_types::OperationContext;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered sequence of guards with deny-wins semantics.
///
/// Cloning is cheap; guards are shared.
#[derive(Clone, Default)]
pub struct GuardChain {
    guards: Vec<Arc<dyn Guard>>,
}

impl GuardChain {
    /// Empty chain. Allows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard (builder).
    pub fn with<G: Guard + 'static>(mut self, guard: G) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    /// Append a shared guard (builder).
    pub fn with_arc(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Append a guard in place.
    pub fn push(&mut self, guard: Arc<dyn Guard>) {
        self.guards.push(guard);
    }

    /// Append every guard of `other`, after the guards already present.
    pub fn extend(&mut self, other: &GuardChain) {
        self.guards.extend(other.guards.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Guard names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Evaluate the chain for one invocation.
    pub async fn authorize(&self, ctx: &OperationContext) -> GuardDecision {
        Self::chained(&[self], ctx).await
    }

    /// Evaluate several chains as one: every guard of `chains[0]`, then every
    /// guard of `chains[1]`, and so on. The first denial stops evaluation.
    pub async fn chained(chains: &[&GuardChain], ctx: &OperationContext) -> GuardDecision {
        let mut evaluated = 0usize;

        for guard in chains.iter().flat_map(|c| c.guards.iter()) {
            evaluated += 1;
            let decision = guard.check(ctx).await;

            debug!(
                correlation_id = %ctx.correlation_id,
                operation = %ctx.operation,
                guard = guard.name(),
                allowed = decision.allowed,
                "Guard evaluated"
            );

            if decision.is_denied() {
                let reason = decision
                    .reason
                    .unwrap_or_else(|| format!("denied by {}", guard.name()));
                warn!(
                    correlation_id = %ctx.correlation_id,
                    operation = %ctx.operation,
                    guard = guard.name(),
                    reason = %reason,
                    "Operation denied"
                );
                return GuardDecision {
                    allowed: false,
                    reason: Some(reason),
                    guard: Some(guard.name().to_string()),
                    evaluated,
                };
            }
        }

        GuardDecision {
            evaluated,
            ..GuardDecision::allow()
        }
    }
}

impl fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardChain")
            .field("guards", &self.names())
            .finish()
    }
}
