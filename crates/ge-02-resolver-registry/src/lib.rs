//! # GE-02 Resolver Registry
//!
//! Maps operation names to their bindings and entity type names to their
//! field sets. Everything is registered explicitly at startup; nothing is
//! discovered by reflection.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): [`ResultShape`], [`EntityType`],
//!   [`UnionType`], [`OperationBinding`], [`ArgumentSpec`]
//! - **Ports Layer** (`ports/`): [`OperationResolver`], [`FieldResolver`]
//! - **Service Layer** (`service`): [`ResolverRegistry`]
//!
//! ## Usage Example
//!
//! ```ignore
//! let mut registry = ResolverRegistry::new();
//! registry.register_entity(
//!     EntityType::new("Recipe")
//!         .attribute("id", ResultShape::Scalar)
//!         .computed("ingredients", ResultShape::list(ResultShape::entity("Ingredient")), resolver),
//! )?;
//! registry.register_operation(
//!     OperationBinding::query("recipe", ResultShape::entity("Recipe"), recipe_resolver)
//!         .argument(ArgumentSpec::with_default("id", "1")),
//! )?;
//! registry.validate()?;
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    ArgumentSpec, EntityType, EventFilter, FieldDef, FieldKind, OperationBinding,
    OperationHandler, ResultShape, TypePredicate, UnionType,
};
pub use error::{RegistryError, RegistryItem, ResolverError};
pub use ports::{FieldResolver, OperationResolver};
pub use service::ResolverRegistry;
