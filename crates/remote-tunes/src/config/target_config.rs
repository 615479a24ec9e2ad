use crate::config::default_prog_id;

use serde::{Deserialize, Serialize};

/// Media target configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Programmatic identifier of the player's automation server.
    #[serde(default = "default_prog_id")]
    pub prog_id: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            prog_id: default_prog_id(),
        }
    }
}
