//! # GE-03 Field Composer
//!
//! Assembles the client-visible composite for an entity: plain attributes are
//! copied, computed fields are resolved concurrently, and the results are
//! merged under their field names once every resolution has finished.
//!
//! ## Invariants
//!
//! - Output carries `__typename` first, then fields in declaration order,
//!   whatever order the resolutions finish in.
//! - All field resolutions are joined before returning; the first failure in
//!   declaration order is reported.
//! - A union value matches exactly one member type or fails with
//!   [`ComposeError::UnresolvableUnionMember`].
//! - The source entity is never mutated.

pub mod config;
pub mod error;
pub mod service;

pub use config::ComposerConfig;
pub use error::ComposeError;
pub use service::{Composite, FieldComposer};
