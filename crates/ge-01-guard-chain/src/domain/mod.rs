//! Domain Layer - authorization outcomes and access tiers.
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod decision;
pub mod tier;

pub use decision::GuardDecision;
pub use tier::OperationTier;
