//! # Graph Engine Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Spy store, sample recipes, engine builders
//! │   └── integration/      # Cross-crate flows
//! │       ├── recipe_flows.rs
//! │       ├── guard_flows.rs
//! │       ├── delivery.rs
//! │       └── runtime_flows.rs
//! └── benches/
//!     └── engine_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ge-tests
//!
//! # By flow
//! cargo test -p ge-tests integration::recipe_flows::
//! cargo test -p ge-tests integration::delivery::
//!
//! # Benchmarks
//! cargo bench -p ge-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
