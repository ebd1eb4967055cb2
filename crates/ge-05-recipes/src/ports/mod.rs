//! Ports Layer
//!
//! - `outbound`: the domain data store the resolvers consume.

pub mod outbound;

pub use outbound::RecipeStore;
