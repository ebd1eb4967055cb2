//! # Engine Container
//!
//! Builds the engine in dependency order:
//!
//! ```text
//! Level 0: Event bus, recipe store (no dependencies)
//! Level 1: Resolver registry (store, config)
//! Level 2: Operation dispatcher (registry, bus)
//! ```
//!
//! The registry is frozen behind an `Arc` once validated; nothing registers
//! after startup.

use std::sync::Arc;

use ge_02_resolver_registry::{RegistryError, ResolverRegistry};
use ge_04_operation_dispatcher::OperationDispatcher;
use ge_05_recipes::{register_recipes, InMemoryRecipeStore, RecipeStore};
use shared_bus::{BusError, InMemoryEventBus};
use thiserror::Error;
use tracing::info;

use crate::container::config::RuntimeConfig;

/// Startup failures.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("event bus: {0}")]
    Bus(#[from] BusError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Every long-lived component of a running engine.
pub struct EngineContainer {
    pub bus: Arc<InMemoryEventBus>,
    pub store: Arc<dyn RecipeStore>,
    pub registry: Arc<ResolverRegistry>,
    pub dispatcher: Arc<OperationDispatcher>,
}

impl EngineContainer {
    /// Engine backed by an empty in-memory recipe store.
    pub fn new(config: &RuntimeConfig) -> Result<Self, BuildError> {
        Self::with_store(config, Arc::new(InMemoryRecipeStore::new()))
    }

    /// Engine backed by `store`.
    pub fn with_store(
        config: &RuntimeConfig,
        store: Arc<dyn RecipeStore>,
    ) -> Result<Self, BuildError> {
        // Level 0
        let bus = Arc::new(InMemoryEventBus::from_config(&config.bus)?);

        // Level 1
        let mut registry = ResolverRegistry::new();
        register_recipes(&mut registry, Arc::clone(&store), &config.recipes)?;
        registry.validate()?;
        let registry = Arc::new(registry);

        // Level 2
        let dispatcher = Arc::new(OperationDispatcher::with_config(
            Arc::clone(&registry),
            Arc::clone(&bus),
            config.composer.clone(),
            &config.dispatcher,
        ));

        info!(
            operations = registry.operation_count(),
            entities = registry.entity_count(),
            bus_capacity = bus.capacity(),
            global_guards = dispatcher.global_guards().len(),
            "Engine container ready"
        );

        Ok(Self {
            bus,
            store,
            registry,
            dispatcher,
        })
    }
}
