//! # GE-04 Operation Dispatcher
//!
//! Entry point for client operations. Each request moves through
//! `Received → Authorizing → Resolving → Composing → Completed`, or ends in
//! `Denied` / `Failed`.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): [`DispatchState`], [`OperationRequest`],
//!   [`DispatchResponse`], [`PublishStatus`], [`DispatchError`]
//! - **Service Layer** (`service`): [`OperationDispatcher`]
//! - **Live sequences** (`subscription`): [`LiveSubscription`]
//! - **Metrics** (`metrics`): [`DispatchMetrics`]
//!
//! ## Guarantees
//!
//! - Unknown operations fail with `NotRegistered` before any guard runs.
//! - A denial stops the request before the resolver is invoked.
//! - Mutations publish their result after the domain write succeeds and
//!   before returning; a publish problem is reported in the response, never
//!   as a failure of the mutation.
//! - Subscription payloads are composed when pulled.

pub mod domain;
pub mod metrics;
pub mod service;
pub mod subscription;

pub use domain::{
    codes, DispatchError, DispatchResponse, DispatchState, DispatcherConfig, ErrorBody,
    OperationRequest, PublishStatus,
};
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot};
pub use service::{DispatchOutcome, OperationDispatcher};
pub use subscription::LiveSubscription;
