//! # Graph Telemetry
//!
//! Structured logging for the graph engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graph_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_tracing(&TelemetryConfig::from_env())?;
//!     // tracing macros now reach stderr
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GE_SERVICE_NAME` | `graph-engine` | Service name attached to startup logs |
//! | `GE_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `GE_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |
//! | `GE_CONSOLE_OUTPUT` | `true` | Emit logs at all |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
