//! Event bus configuration.

use crate::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};

/// Event bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Per-subscriber buffer size. A subscriber holding this many undelivered
    /// events has further events dropped until it catches up.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BusConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.channel_capacity == 0 {
            return Err("channel_capacity cannot be 0".into());
        }
        Ok(())
    }
}
