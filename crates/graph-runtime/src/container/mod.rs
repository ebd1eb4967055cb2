//! # Engine Container
//!
//! Configuration loading and dependency-ordered construction of the engine.

pub mod config;
pub mod wiring;

pub use config::{ConfigError, RuntimeConfig};
pub use wiring::{BuildError, EngineContainer};
