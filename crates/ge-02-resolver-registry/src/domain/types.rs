//! Entity and union type definitions.

use super::shape::ResultShape;
use crate::ports::FieldResolver;
use shared_types::Entity;
use std::fmt;
use std::sync::Arc;

/// Decides whether a concrete entity belongs to a type.
pub type TypePredicate = Arc<dyn Fn(&Entity) -> bool + Send + Sync>;

/// How a field gets its value.
#[derive(Clone)]
pub enum FieldKind {
    /// Copied from the entity's stored attributes.
    Attribute,
    /// Produced by a resolver.
    Computed {
        resolver: Arc<dyn FieldResolver>,
        needs_parent: bool,
    },
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Attribute => f.write_str("Attribute"),
            FieldKind::Computed { needs_parent, .. } => f
                .debug_struct("Computed")
                .field("needs_parent", needs_parent)
                .finish_non_exhaustive(),
        }
    }
}

/// One declared field of an entity type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub shape: ResultShape,
    pub kind: FieldKind,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl FieldDef {
    pub fn is_computed(&self) -> bool {
        matches!(self.kind, FieldKind::Computed { .. })
    }

    /// `true` when the resolver must receive the parent entity.
    pub fn needs_parent(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Computed {
                needs_parent: true,
                ..
            }
        )
    }
}

/// A named composite with a fixed, ordered field set.
#[derive(Clone)]
pub struct EntityType {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    is_type_of: Option<TypePredicate>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            is_type_of: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Plain stored attribute.
    pub fn attribute(self, name: impl Into<String>, shape: ResultShape) -> Self {
        self.field(name, shape, FieldKind::Attribute)
    }

    /// Computed field whose resolver receives the parent entity.
    pub fn computed<R: FieldResolver + 'static>(
        self,
        name: impl Into<String>,
        shape: ResultShape,
        resolver: R,
    ) -> Self {
        self.field(
            name,
            shape,
            FieldKind::Computed {
                resolver: Arc::new(resolver),
                needs_parent: true,
            },
        )
    }

    /// Computed field whose resolver does not look at the parent.
    pub fn detached<R: FieldResolver + 'static>(
        self,
        name: impl Into<String>,
        shape: ResultShape,
        resolver: R,
    ) -> Self {
        self.field(
            name,
            shape,
            FieldKind::Computed {
                resolver: Arc::new(resolver),
                needs_parent: false,
            },
        )
    }

    /// Append a field with an explicit kind.
    pub fn field(mut self, name: impl Into<String>, shape: ResultShape, kind: FieldKind) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            shape,
            kind,
            description: None,
            deprecation_reason: None,
        });
        self
    }

    /// Mark the most recently added field as deprecated.
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.deprecation_reason = Some(reason.into());
        }
        self
    }

    /// Override union member identification.
    pub fn is_type_of<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Entity) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(predicate));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `true` if `entity` is an instance of this type.
    ///
    /// Without an explicit predicate, compares the entity's type name.
    pub fn matches(&self, entity: &Entity) -> bool {
        match &self.is_type_of {
            Some(predicate) => predicate(entity),
            None => entity.type_name == self.name,
        }
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("custom_is_type_of", &self.is_type_of.is_some())
            .finish()
    }
}

/// Closed set of alternative entity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    name: String,
    members: Vec<String>,
}

impl UnionType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}
