//! Recipe surface configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipesConfig {
    /// Value of every recipe's `rating` field.
    pub default_rating: i64,
    /// `id` used by `recipe` when the caller omits it.
    pub default_recipe_id: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            default_rating: 10,
            default_recipe_id: "1".to_string(),
        }
    }
}

impl RecipesConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_recipe_id.is_empty() {
            return Err("default_recipe_id cannot be empty".into());
        }
        Ok(())
    }
}
