//! # Graph Runtime
//!
//! Process-level wiring for the graph engine.
//!
//! ## Modules
//!
//! - `container`: [`RuntimeConfig`] loading (TOML file + environment) and the
//!   dependency-ordered [`EngineContainer`]
//! - `driver`: the newline-delimited JSON [`Driver`] serving requests,
//!   cancellations and subscription notifications
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `GE_CONFIG` | path of a TOML configuration file |
//! | `GE_BUS_CAPACITY` | per-subscriber buffer size |
//! | `GE_DEFAULT_RATING` | value of every recipe's `rating` |
//! | `GE_API_KEY` | API key for protected/admin tiers |
//! | `GE_LOG_LEVEL`, `GE_JSON_LOGS`, `GE_SERVICE_NAME` | logging (see `graph-telemetry`) |

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod driver;

pub use container::{BuildError, ConfigError, EngineContainer, RuntimeConfig};
pub use driver::{Driver, DriverSummary};
