use crate::config::default_module_path;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Hook agent module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Path to the agent module. Relative paths resolve against the
    /// executable's directory.
    #[serde(default = "default_module_path")]
    pub module_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            module_path: default_module_path(),
        }
    }
}
