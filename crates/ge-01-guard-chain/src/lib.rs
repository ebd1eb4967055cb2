//! # GE-01 Guard Chain
//!
//! Ordered authorization checks evaluated before a protected operation runs.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): [`GuardDecision`], [`OperationTier`]
//! - **Ports Layer** (`ports/`): [`Guard`], the authorization collaborator
//! - **Service Layer** (`service`): [`GuardChain`], deny-wins evaluation
//! - **Adapters Layer** (`adapters/`): built-in guards over [`CallerIdentity`]
//!
//! ## Invariants
//!
//! - Guards run in declared order; the first denial ends evaluation and later
//!   guards are never consulted.
//! - An empty chain allows.
//! - A decision is computed per invocation and never cached.
//! - Guards only read the operation context.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ge_01_guard_chain::{AuthenticatedGuard, GuardChain, RoleGuard};
//!
//! let chain = GuardChain::new()
//!     .with(AuthenticatedGuard)
//!     .with(RoleGuard::new("editor"));
//!
//! let decision = chain.authorize(&ctx).await;
//! if !decision.allowed {
//!     // fail with an authorization error, nothing else runs
//! }
//! ```
//!
//! [`CallerIdentity`]: shared_types::CallerIdentity

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    constant_time_compare, ApiKeyGuard, AuthenticatedGuard, OperationTierGuard, PredicateGuard,
    RoleGuard,
};
pub use domain::{GuardDecision, OperationTier};
pub use ports::Guard;
pub use service::GuardChain;
