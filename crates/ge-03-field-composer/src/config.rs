//! Composer configuration.

use serde::{Deserialize, Serialize};

/// Default bound on nested entity composition.
pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Maximum number of nested entity levels in one composite.
    pub max_depth: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ComposerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth cannot be 0".into());
        }
        Ok(())
    }
}
