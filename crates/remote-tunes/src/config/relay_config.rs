use crate::config::default_channel_capacity;

use serde::{Deserialize, Serialize};

/// Relay channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Commands buffered between the relay window and the controller.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl RelayConfig {
    /// Configured capacity, never below one.
    pub fn effective_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}
