//! # GE-05 Recipes
//!
//! The recipe operation surface registered with the engine:
//!
//! | Operation | Kind | Returns |
//! |---|---|---|
//! | `recipe(id = "1")` | query, authenticated | `Recipe` |
//! | `recipes(skip = 0, take = 25)` | query | `[Recipe]` |
//! | `search()` | query, deprecated | `[SearchResult]` |
//! | `addRecipe(newRecipeData)` | mutation, publishes `recipeAdded` | `Recipe` |
//! | `removeRecipe(id)` | mutation | `Boolean` |
//! | `recipeAdded()` | subscription | `Recipe` |
//!
//! `Recipe` composes `ingredients` from its parent and `rating` from
//! configuration; `SearchResult` is the union of `Recipe` and `Ingredient`.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod resolvers;
pub mod schema;

pub use adapters::InMemoryRecipeStore;
pub use config::RecipesConfig;
pub use domain::{Ingredient, NewRecipeInput, Recipe, RecipesArgs};
pub use error::StoreError;
pub use ports::RecipeStore;
pub use schema::{register_recipes, topics, types};
