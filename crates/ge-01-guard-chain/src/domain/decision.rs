//! Guard decision attached to one operation invocation.

use serde::Serialize;

/// Outcome of a guard, or of a whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardDecision {
    /// `true` when the operation may proceed.
    pub allowed: bool,
    /// Optional human-readable reason (usually set on denial).
    pub reason: Option<String>,
    /// Name of the guard that denied. Set by the chain.
    pub guard: Option<String>,
    /// How many guards were consulted to reach this decision. Set by the chain.
    pub evaluated: usize,
}

impl GuardDecision {
    /// Allow with no reason.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            guard: None,
            evaluated: 0,
        }
    }

    /// Deny with a reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            guard: None,
            evaluated: 0,
        }
    }

    /// Allow when `allowed`, otherwise deny with `reason`.
    pub fn from_bool(allowed: bool, reason: impl Into<String>) -> Self {
        if allowed {
            Self::allow()
        } else {
            Self::deny(reason)
        }
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}
