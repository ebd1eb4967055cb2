//! Adapters Layer - built-in guards.

mod api_key;
mod identity;
mod tier;

pub use api_key::{constant_time_compare, ApiKeyGuard};
pub use identity::{AuthenticatedGuard, PredicateGuard, RoleGuard};
pub use tier::OperationTierGuard;
