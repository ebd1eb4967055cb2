//! In-memory recipe store.

use crate::domain::{NewRecipeInput, Recipe, RecipesArgs};
use crate::error::StoreError;
use crate::ports::RecipeStore;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Insertion-ordered store. Ids are sequential decimal strings starting at 1.
#[derive(Debug)]
pub struct InMemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
    next_id: AtomicU64,
}

impl Default for InMemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            recipes: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store pre-populated with `recipes`; new ids continue after the largest
    /// numeric id present.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        let next = recipes
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            recipes: RwLock::new(recipes),
            next_id: AtomicU64::new(next),
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.read().is_empty()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn find_one_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes.read().iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self, args: &RecipesArgs) -> Result<Vec<Recipe>, StoreError> {
        let skip = usize::try_from(args.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(args.take).unwrap_or(usize::MAX);
        Ok(self
            .recipes
            .read()
            .iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn create(&self, input: NewRecipeInput) -> Result<Recipe, StoreError> {
        input.validate().map_err(StoreError::Invalid)?;

        let recipe = Recipe {
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
            title: input.title,
            description: input.description,
            creation_date: Utc::now(),
            ingredients: input.ingredients,
        };
        self.recipes.write().push(recipe.clone());
        debug!(id = %recipe.id, title = %recipe.title, "Recipe created");
        Ok(recipe)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut recipes = self.recipes.write();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() != before)
    }
}
