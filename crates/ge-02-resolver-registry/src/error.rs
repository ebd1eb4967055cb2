//! Error types for the resolver registry and the resolvers it holds.

use std::fmt;
use thiserror::Error;

/// What kind of registry entry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryItem {
    Operation,
    Entity,
    Union,
    Field,
}

impl fmt::Display for RegistryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistryItem::Operation => "operation",
            RegistryItem::Entity => "entity type",
            RegistryItem::Union => "union",
            RegistryItem::Field => "field",
        })
    }
}

/// Registration, lookup and argument binding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{item} not registered: {name}")]
    NotRegistered { item: RegistryItem, name: String },

    #[error("{item} already registered: {name}")]
    Duplicate { item: RegistryItem, name: String },

    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },

    #[error("Invalid binding for '{operation}': {reason}")]
    InvalidBinding { operation: String, reason: String },
}

impl RegistryError {
    pub fn not_registered(item: RegistryItem, name: impl Into<String>) -> Self {
        RegistryError::NotRegistered {
            item,
            name: name.into(),
        }
    }
}

/// Errors returned by operation and field resolvers.
///
/// Domain failures are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// A single-entity lookup found nothing.
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The domain collaborator failed.
    #[error("{0}")]
    Domain(String),
}

impl ResolverError {
    pub fn domain(err: impl fmt::Display) -> Self {
        ResolverError::Domain(err.to_string())
    }
}
