//! Operation inputs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SKIP: u64 = 0;
pub const DEFAULT_TAKE: u64 = 25;
pub const MAX_TAKE: u64 = 50;

/// Pagination for `recipes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipesArgs {
    pub skip: u64,
    pub take: u64,
}

impl Default for RecipesArgs {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            take: DEFAULT_TAKE,
        }
    }
}

impl RecipesArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.take == 0 || self.take > MAX_TAKE {
            return Err(format!("take must be between 1 and {}", MAX_TAKE));
        }
        Ok(())
    }
}

/// Payload of `addRecipe(newRecipeData)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipeInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl NewRecipeInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            ingredients: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title cannot be empty".into());
        }
        Ok(())
    }
}
