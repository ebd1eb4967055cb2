//! # Integration Tests
//!
//! Cross-crate flows through the fully wired engine.

pub mod delivery;
pub mod guard_flows;
pub mod recipe_flows;
pub mod runtime_flows;
