mod agent_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod relay_config;
mod target_config;

pub(crate) use {
    agent_config::AgentConfig, behaviour_config::BehaviourConfig, config::Config,
    relay_config::RelayConfig, target_config::TargetConfig,
};

pub(crate) const DEFAULT_MODULE_PATH: &str = "remote_tunes_hook.dll";
pub(crate) const DEFAULT_PROG_ID: &str = "iTunes.Application";
pub(crate) const DEFAULT_ENABLE_ON_START: bool = true;
pub(crate) const DEFAULT_NOTIFY_ERRORS: bool = true;
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 8;

pub(crate) fn default_module_path() -> std::path::PathBuf {
    DEFAULT_MODULE_PATH.into()
}

pub(crate) fn default_prog_id() -> String {
    DEFAULT_PROG_ID.to_string()
}

pub(crate) fn default_enable_on_start() -> bool {
    DEFAULT_ENABLE_ON_START
}

pub(crate) fn default_notify_errors() -> bool {
    DEFAULT_NOTIFY_ERRORS
}

pub(crate) fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}
