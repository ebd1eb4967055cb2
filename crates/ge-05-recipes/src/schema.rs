//! Registration of the recipe surface.

use crate::config::RecipesConfig;
use crate::ports::RecipeStore;
use crate::resolvers::{
    AddRecipe, ConstantRating, ListRecipes, RecipeById, RecipeIngredients, RemoveRecipe, Search,
};
use ge_01_guard_chain::AuthenticatedGuard;
use ge_02_resolver_registry::{
    ArgumentSpec, EntityType, OperationBinding, RegistryError, ResolverRegistry, ResultShape,
    UnionType,
};
use std::sync::Arc;
use tracing::info;

/// Entity and union names.
pub mod types {
    pub const RECIPE: &str = "Recipe";
    pub const INGREDIENT: &str = "Ingredient";
    pub const SEARCH_RESULT: &str = "SearchResult";
}

/// Bus topics.
pub mod topics {
    pub const RECIPE_ADDED: &str = "recipeAdded";
}

/// Register recipe types and operations.
pub fn register_recipes(
    registry: &mut ResolverRegistry,
    store: Arc<dyn RecipeStore>,
    config: &RecipesConfig,
) -> Result<(), RegistryError> {
    let recipe = || ResultShape::entity(types::RECIPE);

    registry.register_entity(
        EntityType::new(types::INGREDIENT).attribute("name", ResultShape::Scalar),
    )?;
    registry.register_entity(
        EntityType::new(types::RECIPE)
            .describe("recipe")
            .attribute("id", ResultShape::Scalar)
            .attribute("title", ResultShape::Scalar)
            .attribute("description", ResultShape::Scalar)
            .attribute("creationDate", ResultShape::Scalar)
            .computed(
                "ingredients",
                ResultShape::list(ResultShape::entity(types::INGREDIENT)),
                RecipeIngredients,
            )
            .detached("rating", ResultShape::Scalar, ConstantRating(config.default_rating)),
    )?;
    registry.register_union(UnionType::new(
        types::SEARCH_RESULT,
        [types::RECIPE, types::INGREDIENT],
    ))?;

    registry.register_operation(
        OperationBinding::query("recipe", recipe(), RecipeById::new(Arc::clone(&store)))
            .describe("get recipe by id")
            .argument(
                ArgumentSpec::with_default("id", config.default_recipe_id.clone())
                    .describe("recipe id"),
            )
            .guarded_by(AuthenticatedGuard),
    )?;
    registry.register_operation(
        OperationBinding::query(
            "recipes",
            ResultShape::list(recipe()),
            ListRecipes::new(Arc::clone(&store)),
        )
        .argument(ArgumentSpec::with_default("skip", 0))
        .argument(ArgumentSpec::with_default("take", 25)),
    )?;
    registry.register_operation(
        OperationBinding::query(
            "search",
            ResultShape::list(ResultShape::union(types::SEARCH_RESULT)),
            Search,
        )
        .deprecated("test"),
    )?;
    registry.register_operation(
        OperationBinding::mutation("addRecipe", recipe(), AddRecipe::new(Arc::clone(&store)))
            .argument(ArgumentSpec::required("newRecipeData"))
            .publishes(topics::RECIPE_ADDED),
    )?;
    registry.register_operation(
        OperationBinding::mutation("removeRecipe", ResultShape::Scalar, RemoveRecipe::new(store))
            .argument(ArgumentSpec::required("id")),
    )?;
    registry.register_operation(
        OperationBinding::subscription("recipeAdded", recipe(), topics::RECIPE_ADDED)
            .describe("subscription description"),
    )?;

    info!(
        operations = registry.operation_count(),
        rating = config.default_rating,
        "Recipe operations registered"
    );
    Ok(())
}
