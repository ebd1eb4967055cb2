//! # Core Domain Entities
//!
//! - [`Entity`]: a named composite holding its stored attributes.
//! - [`ResolvedValue`]: what a resolver hands back to the engine before
//!   composition (nothing, a scalar, an entity, or an ordered list).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored attributes of an entity, in insertion order.
pub type AttributeMap = Map<String, Value>;

/// A runtime instance of a named entity type.
///
/// `type_name` is the instance's own claim about its type. Union member
/// selection does not trust it blindly: each registered entity type decides
/// through its own predicate whether an instance belongs to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Concrete type tag (e.g. `"Recipe"`).
    pub type_name: String,
    /// Stored attributes.
    pub attributes: AttributeMap,
}

impl Entity {
    /// Create an entity with no attributes.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Build an entity from any serializable record.
    ///
    /// Records that do not serialize to a JSON object are stored under a
    /// single `value` attribute.
    pub fn from_record<T: Serialize>(
        type_name: impl Into<String>,
        record: &T,
    ) -> Result<Self, serde_json::Error> {
        let attributes = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            other => {
                let mut map = AttributeMap::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Ok(Self {
            type_name: type_name.into(),
            attributes,
        })
    }

    /// Get a stored attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get a stored attribute as a string slice.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Whether the entity stores the attribute (even if null).
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Output of an operation or field resolver, prior to composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolvedValue {
    /// Absence (`null`).
    Null,
    /// A plain JSON value (string, number, boolean, object without a type).
    Scalar(Value),
    /// A single entity to be composed.
    Entity(Entity),
    /// An ordered list; order is preserved through composition.
    List(Vec<ResolvedValue>),
}

impl ResolvedValue {
    /// Wrap a scalar.
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// Wrap a list of entities.
    pub fn entities(items: impl IntoIterator<Item = Entity>) -> Self {
        Self::List(items.into_iter().map(Self::Entity).collect())
    }

    /// `true` for [`ResolvedValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the entity, if this is one.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Borrow the scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Entity> for ResolvedValue {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}

impl From<Option<Entity>> for ResolvedValue {
    fn from(entity: Option<Entity>) -> Self {
        entity.map_or(Self::Null, Self::Entity)
    }
}

impl From<bool> for ResolvedValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}
