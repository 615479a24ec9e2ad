use crate::config::{default_enable_on_start, default_notify_errors};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Install the hook as soon as the controller starts.
    #[serde(default = "default_enable_on_start")]
    pub enable_on_start: bool,
    /// Show desktop notifications for user-visible errors.
    #[serde(default = "default_notify_errors")]
    pub notify_errors: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            enable_on_start: default_enable_on_start(),
            notify_errors: default_notify_errors(),
        }
    }
}
