//! Stored records.

use crate::schema::types;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Entity;

/// A stored recipe. `ingredients` holds ingredient names; the composed
/// `ingredients` field turns them into `Ingredient` entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Recipe {
    pub fn to_entity(&self) -> Result<Entity, serde_json::Error> {
        Entity::from_record(types::RECIPE, self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn to_entity(&self) -> Entity {
        Entity::new(types::INGREDIENT).with("name", self.name.clone())
    }
}
