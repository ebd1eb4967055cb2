//! Domain Layer - dispatch states, requests, responses and errors.

pub mod config;
pub mod error;
pub mod request;
pub mod state;

pub use config::DispatcherConfig;
pub use error::{codes, DispatchError, ErrorBody};
pub use request::{DispatchResponse, OperationRequest, PublishStatus};
pub use state::DispatchState;
