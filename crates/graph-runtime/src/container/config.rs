//! # Runtime Configuration
//!
//! One TOML document aggregating every component's settings:
//!
//! ```toml
//! [bus]
//! channel_capacity = 1000
//!
//! [composer]
//! max_depth = 16
//!
//! [dispatcher]
//! mutation_tier = "protected"
//! api_key = "..."
//!
//! [recipes]
//! default_rating = 10
//! ```
//!
//! Every section is optional. Load order: defaults, then the file named by
//! `GE_CONFIG`, then environment overrides.

use ge_03_field_composer::ComposerConfig;
use ge_04_operation_dispatcher::DispatcherConfig;
use ge_05_recipes::RecipesConfig;
use serde::{Deserialize, Serialize};
use shared_bus::BusConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Path of the TOML configuration file.
pub const ENV_CONFIG_PATH: &str = "GE_CONFIG";
/// Per-subscriber buffer size override.
pub const ENV_BUS_CAPACITY: &str = "GE_BUS_CAPACITY";
/// `rating` value override.
pub const ENV_DEFAULT_RATING: &str = "GE_DEFAULT_RATING";
/// API key for protected/admin tiers.
pub const ENV_API_KEY: &str = "GE_API_KEY";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub bus: BusConfig,
    pub composer: ComposerConfig,
    pub dispatcher: DispatcherConfig,
    pub recipes: RecipesConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {section} config: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => {
                info!(path = %path, "Loading configuration file");
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };
        config.apply_overrides(&lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides. Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(capacity) = lookup(ENV_BUS_CAPACITY) {
            match capacity.parse() {
                Ok(c) => self.bus.channel_capacity = c,
                Err(_) => warn!(value = %capacity, "Ignoring invalid {}", ENV_BUS_CAPACITY),
            }
        }

        if let Some(rating) = lookup(ENV_DEFAULT_RATING) {
            match rating.parse() {
                Ok(r) => self.recipes.default_rating = r,
                Err(_) => warn!(value = %rating, "Ignoring invalid {}", ENV_DEFAULT_RATING),
            }
        }

        if let Some(key) = lookup(ENV_API_KEY) {
            info!("Loaded API key from environment");
            self.dispatcher.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(section: &'static str) -> impl Fn(String) -> ConfigError {
            move |reason| ConfigError::Invalid { section, reason }
        }

        self.bus.validate().map_err(invalid("bus"))?;
        self.composer.validate().map_err(invalid("composer"))?;
        self.dispatcher.validate().map_err(invalid("dispatcher"))?;
        self.recipes.validate().map_err(invalid("recipes"))?;
        Ok(())
    }
}
