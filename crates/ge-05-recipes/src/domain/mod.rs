//! Domain Layer - recipe records and operation inputs.

pub mod args;
pub mod models;

pub use args::{NewRecipeInput, RecipesArgs};
pub use models::{Ingredient, Recipe};
