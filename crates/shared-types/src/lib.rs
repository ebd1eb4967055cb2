//! # Shared Types Crate
//!
//! Value model shared by the resolution engine, the event bus and the
//! operation surfaces built on top of them.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: entity and value types used across crates are
//!   defined here and nowhere else.
//! - **Immutable payloads**: an [`Entity`] handed to a composer or published on
//!   the bus is never mutated; composition produces new values.
//! - **Order preserving**: attribute maps keep insertion order
//!   (`serde_json` is built with `preserve_order`).

pub mod context;
pub mod correlation;
pub mod entities;

pub use context::{CallerIdentity, OperationContext, OperationKind};
pub use correlation::CorrelationId;
pub use entities::{AttributeMap, Entity, ResolvedValue};

/// Key under which composed objects carry their concrete type name.
pub const TYPENAME_FIELD: &str = "__typename";
