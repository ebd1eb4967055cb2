//! Field composition service.

use crate::config::ComposerConfig;
use crate::error::ComposeError;
use futures::future::{join_all, BoxFuture, FutureExt};
use ge_02_resolver_registry::{EntityType, FieldDef, FieldKind, ResolverRegistry, ResultShape};
use serde_json::Value;
use shared_types::{AttributeMap, Entity, ResolvedValue, TYPENAME_FIELD};
use std::sync::Arc;
use tracing::{debug, trace};

/// Client-visible composite: `__typename` followed by declared fields.
pub type Composite = AttributeMap;

/// Composes resolved values against registered entity types.
#[derive(Debug, Clone)]
pub struct FieldComposer {
    registry: Arc<ResolverRegistry>,
    config: ComposerConfig,
}

impl FieldComposer {
    pub fn new(registry: Arc<ResolverRegistry>) -> Self {
        Self::with_config(registry, ComposerConfig::default())
    }

    pub fn with_config(registry: Arc<ResolverRegistry>, config: ComposerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<ResolverRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose one entity instance against a registered entity type.
    pub async fn compose(&self, entity: &Entity, type_name: &str) -> Result<Composite, ComposeError> {
        let entity_type = self.registry.entity(type_name)?;
        self.compose_entity(entity, entity_type, 0).await
    }

    /// Compose any resolved value against a declared shape.
    ///
    /// Lists keep their order. `Null` composes to `null` for every shape.
    pub async fn compose_value(
        &self,
        value: &ResolvedValue,
        shape: &ResultShape,
    ) -> Result<Value, ComposeError> {
        self.compose_at(value, shape, 0).await
    }

    /// Pick the single member of `union` that accepts `entity`.
    pub fn select_member(&self, union: &str, entity: &Entity) -> Result<&EntityType, ComposeError> {
        let union_type = self.registry.union(union)?;

        let mut matching = Vec::with_capacity(1);
        for member in union_type.members() {
            let candidate = self.registry.entity(member)?;
            if candidate.matches(entity) {
                matching.push(candidate);
            }
        }

        match matching.as_slice() {
            [only] => Ok(*only),
            _ => {
                debug!(
                    union,
                    type_name = %entity.type_name,
                    matches = matching.len(),
                    "Union member not resolvable"
                );
                Err(ComposeError::UnresolvableUnionMember {
                    union: union.to_string(),
                    type_name: entity.type_name.clone(),
                    matches: matching.len(),
                })
            }
        }
    }

    fn compose_at<'a>(
        &'a self,
        value: &'a ResolvedValue,
        shape: &'a ResultShape,
        depth: usize,
    ) -> BoxFuture<'a, Result<Value, ComposeError>> {
        async move {
            match (shape, value) {
                (_, ResolvedValue::Null) => Ok(Value::Null),
                (ResultShape::Scalar, other) => Ok(plain(other)),
                (ResultShape::List(inner), ResolvedValue::List(items)) => {
                    let composed =
                        join_all(items.iter().map(|item| self.compose_at(item, inner, depth)))
                            .await;
                    composed
                        .into_iter()
                        .collect::<Result<Vec<_>, _>>()
                        .map(Value::Array)
                }
                (ResultShape::Entity(name), ResolvedValue::Entity(entity)) => {
                    let entity_type = self.registry.entity(name)?;
                    self.compose_entity(entity, entity_type, depth)
                        .await
                        .map(Value::Object)
                }
                (ResultShape::Union(name), ResolvedValue::Entity(entity)) => {
                    let member = self.select_member(name, entity)?;
                    self.compose_entity(entity, member, depth)
                        .await
                        .map(Value::Object)
                }
                (expected, found) => Err(ComposeError::ShapeMismatch {
                    expected: expected.to_string(),
                    found: kind_name(found),
                }),
            }
        }
        .boxed()
    }

    fn compose_entity<'a>(
        &'a self,
        entity: &'a Entity,
        entity_type: &'a EntityType,
        depth: usize,
    ) -> BoxFuture<'a, Result<Composite, ComposeError>> {
        async move {
            let depth = depth + 1;
            if depth > self.config.max_depth {
                return Err(ComposeError::DepthExceeded {
                    type_name: entity_type.name().to_string(),
                    max_depth: self.config.max_depth,
                });
            }

            let resolutions = entity_type
                .fields()
                .iter()
                .map(|field| self.resolve_field(entity, entity_type, field, depth));
            let values = join_all(resolutions).await;

            let mut composite = Composite::new();
            composite.insert(
                TYPENAME_FIELD.to_string(),
                Value::String(entity_type.name().to_string()),
            );
            for (field, value) in entity_type.fields().iter().zip(values) {
                composite.insert(field.name.clone(), value?);
            }

            trace!(
                type_name = entity_type.name(),
                fields = entity_type.fields().len(),
                depth,
                "Entity composed"
            );
            Ok(composite)
        }
        .boxed()
    }

    async fn resolve_field(
        &self,
        entity: &Entity,
        entity_type: &EntityType,
        field: &FieldDef,
        depth: usize,
    ) -> Result<Value, ComposeError> {
        match &field.kind {
            FieldKind::Attribute => Ok(entity.get(&field.name).cloned().unwrap_or(Value::Null)),
            FieldKind::Computed {
                resolver,
                needs_parent,
            } => {
                let parent = needs_parent.then_some(entity);
                let value = resolver
                    .resolve(parent)
                    .await
                    .map_err(|source| ComposeError::Field {
                        type_name: entity_type.name().to_string(),
                        field: field.name.clone(),
                        source,
                    })?;
                self.compose_at(&value, &field.shape, depth).await
            }
        }
    }
}

/// Scalar-shaped output: entities become their attribute objects.
fn plain(value: &ResolvedValue) -> Value {
    match value {
        ResolvedValue::Null => Value::Null,
        ResolvedValue::Scalar(v) => v.clone(),
        ResolvedValue::Entity(entity) => Value::Object(entity.attributes.clone()),
        ResolvedValue::List(items) => Value::Array(items.iter().map(plain).collect()),
    }
}

fn kind_name(value: &ResolvedValue) -> &'static str {
    match value {
        ResolvedValue::Null => "null",
        ResolvedValue::Scalar(_) => "a scalar",
        ResolvedValue::Entity(_) => "an entity",
        ResolvedValue::List(_) => "a list",
    }
}
