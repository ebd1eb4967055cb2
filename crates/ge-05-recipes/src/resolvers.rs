//! Operation and field resolvers over a [`RecipeStore`].

use crate::domain::{Ingredient, NewRecipeInput, Recipe, RecipesArgs};
use crate::error::StoreError;
use crate::ports::RecipeStore;
use crate::schema::types;
use async_trait::async_trait;
use ge_02_resolver_registry::{FieldResolver, OperationResolver, ResolverError};
use serde_json::Value;
use shared_types::{Entity, OperationContext, ResolvedValue};
use std::sync::Arc;

impl From<StoreError> for ResolverError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(reason) => ResolverError::InvalidArguments(reason),
            other => ResolverError::domain(other),
        }
    }
}

fn required_str<'a>(ctx: &'a OperationContext, name: &str) -> Result<&'a str, ResolverError> {
    ctx.argument_str(name)
        .ok_or_else(|| ResolverError::InvalidArguments(format!("'{}' must be a string", name)))
}

fn recipe_entity(recipe: &Recipe) -> Result<ResolvedValue, ResolverError> {
    recipe
        .to_entity()
        .map(ResolvedValue::Entity)
        .map_err(ResolverError::domain)
}

/// `recipe(id)`: one recipe, or `NotFound(id)`.
pub struct RecipeById {
    store: Arc<dyn RecipeStore>,
}

impl RecipeById {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OperationResolver for RecipeById {
    async fn resolve(&self, ctx: &OperationContext) -> Result<ResolvedValue, ResolverError> {
        let id = required_str(ctx, "id")?;
        match self.store.find_one_by_id(id).await? {
            Some(recipe) => recipe_entity(&recipe),
            None => Err(ResolverError::NotFound(id.to_string())),
        }
    }
}

/// `recipes(skip, take)`: a page in store order.
pub struct ListRecipes {
    store: Arc<dyn RecipeStore>,
}

impl ListRecipes {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OperationResolver for ListRecipes {
    async fn resolve(&self, ctx: &OperationContext) -> Result<ResolvedValue, ResolverError> {
        let args: RecipesArgs = serde_json::from_value(Value::Object(ctx.arguments.clone()))
            .map_err(|e| ResolverError::InvalidArguments(e.to_string()))?;
        args.validate().map_err(ResolverError::InvalidArguments)?;

        let recipes = self.store.find_all(&args).await?;
        recipes
            .iter()
            .map(recipe_entity)
            .collect::<Result<Vec<_>, _>>()
            .map(ResolvedValue::List)
    }
}

/// `search()`: a fixed mixed list of one recipe and one ingredient.
pub struct Search;

#[async_trait]
impl OperationResolver for Search {
    async fn resolve(&self, _ctx: &OperationContext) -> Result<ResolvedValue, ResolverError> {
        Ok(ResolvedValue::List(vec![
            Entity::new(types::RECIPE).with("title", "recipe").into(),
            Ingredient::new("test").to_entity().into(),
        ]))
    }
}

/// `addRecipe(newRecipeData)`.
pub struct AddRecipe {
    store: Arc<dyn RecipeStore>,
}

impl AddRecipe {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OperationResolver for AddRecipe {
    async fn resolve(&self, ctx: &OperationContext) -> Result<ResolvedValue, ResolverError> {
        let data = ctx
            .argument("newRecipeData")
            .cloned()
            .ok_or_else(|| ResolverError::InvalidArguments("'newRecipeData' is required".into()))?;
        let input: NewRecipeInput = serde_json::from_value(data)
            .map_err(|e| ResolverError::InvalidArguments(format!("newRecipeData: {}", e)))?;

        let recipe = self.store.create(input).await?;
        recipe_entity(&recipe)
    }
}

/// `removeRecipe(id)`.
pub struct RemoveRecipe {
    store: Arc<dyn RecipeStore>,
}

impl RemoveRecipe {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OperationResolver for RemoveRecipe {
    async fn resolve(&self, ctx: &OperationContext) -> Result<ResolvedValue, ResolverError> {
        let id = required_str(ctx, "id")?;
        Ok(self.store.remove(id).await?.into())
    }
}

/// `Recipe.ingredients`: the parent's stored names as `Ingredient` entities.
pub struct RecipeIngredients;

#[async_trait]
impl FieldResolver for RecipeIngredients {
    async fn resolve(&self, parent: Option<&Entity>) -> Result<ResolvedValue, ResolverError> {
        let names = parent
            .and_then(|recipe| recipe.get("ingredients"))
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(ResolvedValue::entities(
            names.into_iter().map(|name| Ingredient::new(name).to_entity()),
        ))
    }
}

/// `Recipe.rating`: the same number for every recipe.
pub struct ConstantRating(pub i64);

#[async_trait]
impl FieldResolver for ConstantRating {
    async fn resolve(&self, _parent: Option<&Entity>) -> Result<ResolvedValue, ResolverError> {
        Ok(ResolvedValue::scalar(self.0))
    }
}
