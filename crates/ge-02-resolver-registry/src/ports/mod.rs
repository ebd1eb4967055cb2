//! Ports Layer
//!
//! - `outbound`: resolver functions the registry binds to names.

pub mod outbound;

pub use outbound::{FieldResolver, OperationResolver};
