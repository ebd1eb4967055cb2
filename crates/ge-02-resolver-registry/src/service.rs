//! Resolver registry service.

use crate::domain::{EntityType, FieldDef, OperationBinding, ResultShape, UnionType};
use crate::error::{RegistryError, RegistryItem};
use std::collections::HashMap;
use std::sync::Arc;
use shared_bus::Topic;
use tracing::{debug, warn};

/// Name-keyed store of operation bindings, entity types and unions.
///
/// Populated once at startup, then shared read-only (`Arc<ResolverRegistry>`).
#[derive(Debug, Default)]
pub struct ResolverRegistry {
    operations: HashMap<String, Arc<OperationBinding>>,
    entities: HashMap<String, EntityType>,
    unions: HashMap<String, UnionType>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_entity(&mut self, entity: EntityType) -> Result<(), RegistryError> {
        let name = entity.name().to_string();
        if self.entities.contains_key(&name) || self.unions.contains_key(&name) {
            return Err(RegistryError::Duplicate {
                item: RegistryItem::Entity,
                name,
            });
        }
        debug!(entity = %name, fields = entity.fields().len(), "Registered entity type");
        self.entities.insert(name, entity);
        Ok(())
    }

    pub fn register_union(&mut self, union: UnionType) -> Result<(), RegistryError> {
        let name = union.name().to_string();
        if self.unions.contains_key(&name) || self.entities.contains_key(&name) {
            return Err(RegistryError::Duplicate {
                item: RegistryItem::Union,
                name,
            });
        }
        debug!(union = %name, members = ?union.members(), "Registered union");
        self.unions.insert(name, union);
        Ok(())
    }

    pub fn register_operation(&mut self, binding: OperationBinding) -> Result<(), RegistryError> {
        binding.check()?;
        let name = binding.name().to_string();
        if self.operations.contains_key(&name) {
            return Err(RegistryError::Duplicate {
                item: RegistryItem::Operation,
                name,
            });
        }
        debug!(
            operation = %name,
            kind = %binding.kind(),
            returns = %binding.returns(),
            guards = binding.guard_chain().len(),
            "Registered operation"
        );
        self.operations.insert(name, Arc::new(binding));
        Ok(())
    }

    /// Binding for a client-visible operation name.
    pub fn lookup(&self, operation: &str) -> Result<Arc<OperationBinding>, RegistryError> {
        self.operations
            .get(operation)
            .cloned()
            .ok_or_else(|| RegistryError::not_registered(RegistryItem::Operation, operation))
    }

    pub fn entity(&self, name: &str) -> Result<&EntityType, RegistryError> {
        self.entities
            .get(name)
            .ok_or_else(|| RegistryError::not_registered(RegistryItem::Entity, name))
    }

    pub fn union(&self, name: &str) -> Result<&UnionType, RegistryError> {
        self.unions
            .get(name)
            .ok_or_else(|| RegistryError::not_registered(RegistryItem::Union, name))
    }

    /// Field binding of an entity type.
    pub fn lookup_field(&self, entity_type: &str, field: &str) -> Result<&FieldDef, RegistryError> {
        self.entity(entity_type)?
            .get_field(field)
            .ok_or_else(|| {
                RegistryError::not_registered(RegistryItem::Field, format!("{}.{}", entity_type, field))
            })
    }

    /// Registered operation names, sorted.
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn operations(&self) -> impl Iterator<Item = &Arc<OperationBinding>> {
        self.operations.values()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Check every shape reference resolves to a registered type, and every
    /// subscription topic is non-empty.
    ///
    /// Run once after registration; lookups at dispatch time then only fail
    /// for unknown operation names. Subscription topics no registered
    /// mutation publishes to are logged, not rejected: events may be
    /// published on the bus directly.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut union_names: Vec<&String> = self.unions.keys().collect();
        union_names.sort_unstable();
        for name in union_names {
            for member in self.unions[name].members() {
                self.entity(member)?;
            }
        }

        let mut entity_names: Vec<&String> = self.entities.keys().collect();
        entity_names.sort_unstable();
        for name in entity_names {
            for field in self.entities[name].fields() {
                self.check_shape(&field.shape)?;
            }
        }

        for name in self.operation_names() {
            let binding = &self.operations[name];
            binding.check()?;
            self.check_shape(binding.returns())?;
        }

        for topic in self.orphan_topics() {
            warn!(topic = %topic, "No registered mutation publishes to subscription topic");
        }

        debug!(
            operations = self.operations.len(),
            entities = self.entities.len(),
            unions = self.unions.len(),
            "Registry validated"
        );
        Ok(())
    }

    /// Subscription topics that no registered mutation publishes to, sorted.
    pub fn orphan_topics(&self) -> Vec<&Topic> {
        let published: Vec<&Topic> = self
            .operations
            .values()
            .filter_map(|binding| binding.published_topic())
            .collect();
        let mut orphans: Vec<&Topic> = self
            .operations
            .values()
            .filter_map(|binding| binding.subscribed_topic())
            .filter(|topic| !published.contains(topic))
            .collect();
        orphans.sort_unstable();
        orphans.dedup();
        orphans
    }

    fn check_shape(&self, shape: &ResultShape) -> Result<(), RegistryError> {
        match shape.leaf() {
            ResultShape::Entity(name) => self.entity(name).map(|_| ()),
            ResultShape::Union(name) => self.union(name).map(|_| ()),
            _ => Ok(()),
        }
    }
}
