//! Error types for the recipe store.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Recipe store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid recipe: {0}")]
    Invalid(String),
}
