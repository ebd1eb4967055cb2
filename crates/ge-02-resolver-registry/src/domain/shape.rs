//! Declared result shapes.

use std::fmt;

/// Declared shape of an operation result or a field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// Any JSON value, passed through unchanged.
    Scalar,
    /// Named entity type.
    Entity(String),
    /// Named union; the member is picked per value at runtime.
    Union(String),
    /// Ordered list of an inner shape.
    List(Box<ResultShape>),
}

impl ResultShape {
    pub fn entity(name: impl Into<String>) -> Self {
        ResultShape::Entity(name.into())
    }

    pub fn union(name: impl Into<String>) -> Self {
        ResultShape::Union(name.into())
    }

    pub fn list(inner: ResultShape) -> Self {
        ResultShape::List(Box::new(inner))
    }

    /// Innermost non-list shape.
    pub fn leaf(&self) -> &ResultShape {
        match self {
            ResultShape::List(inner) => inner.leaf(),
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ResultShape::List(_))
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultShape::Scalar => f.write_str("Scalar"),
            ResultShape::Entity(name) | ResultShape::Union(name) => f.write_str(name),
            ResultShape::List(inner) => write!(f, "[{}]", inner),
        }
    }
}
