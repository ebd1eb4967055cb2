//! Error types for composition.

use ge_02_resolver_registry::{RegistryError, ResolverError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A computed field's resolver failed.
    #[error("Failed to resolve {type_name}.{field}: {source}")]
    Field {
        type_name: String,
        field: String,
        source: ResolverError,
    },

    /// Zero or several union members accepted the value.
    #[error("Value of type '{type_name}' matches {matches} members of union '{union}'")]
    UnresolvableUnionMember {
        union: String,
        type_name: String,
        matches: usize,
    },

    #[error("Composition of '{type_name}' exceeds max depth {max_depth}")]
    DepthExceeded { type_name: String, max_depth: usize },

    /// Resolver output does not fit the declared shape.
    #[error("Expected {expected}, resolver returned {found}")]
    ShapeMismatch { expected: String, found: &'static str },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
