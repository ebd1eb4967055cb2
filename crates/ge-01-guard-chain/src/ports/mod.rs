//! Ports Layer
//!
//! - `outbound`: the authorization collaborator the chain consults.

pub mod outbound;

pub use outbound::Guard;
