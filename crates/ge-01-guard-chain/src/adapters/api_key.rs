//! API key guard.

use crate::domain::GuardDecision;
use crate::ports::Guard;
use async_trait::async_trait;
use shared_types::OperationContext;
use std::fmt;
use subtle::ConstantTimeEq;

/// Allows only callers presenting the configured API key.
pub struct ApiKeyGuard {
    expected: String,
}

impl ApiKeyGuard {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// `true` if `presented` matches the configured key.
    pub fn matches(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|key| constant_time_compare(key, &self.expected))
    }
}

#[async_trait]
impl Guard for ApiKeyGuard {
    fn name(&self) -> &str {
        "api-key"
    }

    async fn check(&self, ctx: &OperationContext) -> GuardDecision {
        GuardDecision::from_bool(
            self.matches(ctx.caller.api_key.as_deref()),
            "valid API key required",
        )
    }
}

impl fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyGuard")
            .field("expected", &"<redacted>")
            .finish()
    }
}

/// Compare two secrets without leaking where they differ or how long they are.
///
/// Both inputs are padded to the longer length with different fill bytes, so
/// unequal lengths can never compare equal.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let width = a.len().max(b.len());

    let mut left = vec![0x00u8; width];
    let mut right = vec![0xFFu8; width];
    left[..a.len()].copy_from_slice(a.as_bytes());
    right[..b.len()].copy_from_slice(b.as_bytes());

    let same_len = (a.len() as u64).ct_eq(&(b.len() as u64));
    let same_bytes = left.as_slice().ct_eq(right.as_slice());

    (same_len & same_bytes).into()
}
