//! Shared fixtures: a recording recipe store and engine builders.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ge_04_operation_dispatcher::OperationDispatcher;
use ge_05_recipes::{NewRecipeInput, Recipe, RecipeStore, RecipesArgs, StoreError};
use graph_runtime::{EngineContainer, RuntimeConfig};
use parking_lot::Mutex;
use shared_bus::InMemoryEventBus;
use std::sync::Arc;

/// One call made against a [`SpyRecipeStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindOne(String),
    FindAll(RecipesArgs),
    Create(NewRecipeInput),
    Remove(String),
}

/// Recipe store that records every call and returns canned answers.
///
/// Defaults: no recipe found, empty listing, `remove` returns `false`,
/// `create` echoes the input back with id `"100"`.
#[derive(Debug, Default)]
pub struct SpyRecipeStore {
    calls: Mutex<Vec<StoreCall>>,
    found: Option<Recipe>,
    listing: Vec<Recipe>,
    removes: bool,
}

impl SpyRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finding(mut self, recipe: Recipe) -> Self {
        self.found = Some(recipe);
        self
    }

    pub fn listing(mut self, recipes: Vec<Recipe>) -> Self {
        self.listing = recipes;
        self
    }

    pub fn removing(mut self, removes: bool) -> Self {
        self.removes = removes;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl RecipeStore for SpyRecipeStore {
    async fn find_one_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        self.record(StoreCall::FindOne(id.to_string()));
        Ok(self.found.clone())
    }

    async fn find_all(&self, args: &RecipesArgs) -> Result<Vec<Recipe>, StoreError> {
        self.record(StoreCall::FindAll(*args));
        Ok(self.listing.clone())
    }

    async fn create(&self, input: NewRecipeInput) -> Result<Recipe, StoreError> {
        self.record(StoreCall::Create(input.clone()));
        Ok(Recipe {
            id: "100".to_string(),
            title: input.title,
            description: input.description,
            creation_date: fixed_date(),
            ingredients: input.ingredients,
        })
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::Remove(id.to_string()));
        Ok(self.removes)
    }
}

/// Store whose every call fails.
#[derive(Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl RecipeStore for UnavailableStore {
    async fn find_one_by_id(&self, _id: &str) -> Result<Option<Recipe>, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    async fn find_all(&self, _args: &RecipesArgs) -> Result<Vec<Recipe>, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    async fn create(&self, _input: NewRecipeInput) -> Result<Recipe, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    async fn remove(&self, _id: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }
}

pub fn fixed_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn recipe(id: &str, title: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        creation_date: fixed_date(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
    }
}

/// `count` recipes with ids `1..=count`.
pub fn cookbook(count: usize) -> Vec<Recipe> {
    (1..=count)
        .map(|i| recipe(&i.to_string(), &format!("Recipe {i}"), &["salt", "water"]))
        .collect()
}

/// Fully wired engine over `store` with `config`.
pub fn engine_with(
    config: &RuntimeConfig,
    store: Arc<dyn RecipeStore>,
) -> (Arc<OperationDispatcher>, Arc<InMemoryEventBus>) {
    match EngineContainer::with_store(config, store) {
        Ok(container) => (container.dispatcher, container.bus),
        Err(e) => panic!("engine failed to build: {e}"),
    }
}

/// Fully wired engine over `store` with default configuration.
pub fn engine(store: Arc<dyn RecipeStore>) -> (Arc<OperationDispatcher>, Arc<InMemoryEventBus>) {
    engine_with(&RuntimeConfig::default(), store)
}
