//! Outbound Ports (Driven Ports)
//!
//! Resolvers wrap the domain collaborator. They are invoked by the dispatcher
//! (operations) and by the composer (computed fields).

use crate::error::ResolverError;
use async_trait::async_trait;
use shared_types::{Entity, OperationContext, ResolvedValue};

/// Produces the root value of a query or mutation.
#[async_trait]
pub trait OperationResolver: Send + Sync {
    /// `ctx.arguments` already has defaults substituted.
    async fn resolve(&self, ctx: &OperationContext) -> Result<ResolvedValue, ResolverError>;
}

/// Produces the value of one computed field.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    /// `parent` is `Some` only when the field was bound as needing it.
    async fn resolve(&self, parent: Option<&Entity>) -> Result<ResolvedValue, ResolverError>;
}
