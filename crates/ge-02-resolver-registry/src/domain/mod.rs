//! Domain Layer - result shapes, entity/union types and operation bindings.
//!
//! RULES:
//! - No I/O operations
//! - Resolvers are referenced only through the port traits

pub mod binding;
pub mod shape;
pub mod types;

pub use binding::{ArgumentSpec, EventFilter, OperationBinding, OperationHandler};
pub use shape::ResultShape;
pub use types::{EntityType, FieldDef, FieldKind, TypePredicate, UnionType};
