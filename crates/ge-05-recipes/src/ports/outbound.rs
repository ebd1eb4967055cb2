//! Outbound Ports (Driven Ports)
//!
//! Calls may fail and are never retried by the engine.

use crate::domain::{NewRecipeInput, Recipe, RecipesArgs};
use crate::error::StoreError;
use async_trait::async_trait;

/// Recipe persistence.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_one_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError>;

    /// Page of recipes in store order.
    async fn find_all(&self, args: &RecipesArgs) -> Result<Vec<Recipe>, StoreError>;

    async fn create(&self, input: NewRecipeInput) -> Result<Recipe, StoreError>;

    /// `true` if a recipe was removed.
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;
}
