use crate::{
    AppError,
    config::{
        AgentConfig, Config, DEFAULT_CHANNEL_CAPACITY, DEFAULT_MODULE_PATH, DEFAULT_PROG_ID,
        RelayConfig,
    },
};

use std::path::{Path, PathBuf};

/// WHAT: An empty file yields every default
/// WHY: A freshly created or hand-truncated config must still load
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_file_when_parsing_then_defaults_used() {
    // When: Parsing nothing
    let config = Config::parse("").unwrap();

    // Then: All defaults
    assert_eq!(config, Config::default());
    assert_eq!(config.agent.module_path, PathBuf::from(DEFAULT_MODULE_PATH));
    assert_eq!(config.target.prog_id, DEFAULT_PROG_ID);
    assert!(config.behaviour.enable_on_start);
    assert!(config.behaviour.notify_errors);
    assert_eq!(config.relay.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
}

/// WHAT: Keys present override defaults, missing keys keep them
/// WHY: Users edit single settings by hand
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_file_when_parsing_then_missing_keys_defaulted() {
    // Given: Only two settings
    let contents = r#"
        [target]
        prog_id = "Other.Player"

        [behaviour]
        enable_on_start = false
    "#;

    // When: Parsing
    let config = Config::parse(contents).unwrap();

    // Then: Overrides applied, the rest default
    assert_eq!(config.target.prog_id, "Other.Player");
    assert!(!config.behaviour.enable_on_start);
    assert!(config.behaviour.notify_errors);
    assert_eq!(config.agent, AgentConfig::default());
}

/// WHAT: Malformed TOML is a configuration error
/// WHY: A broken file must be reported, not silently replaced
#[test]
fn given_malformed_file_when_parsing_then_config_error() {
    // When: Parsing a wrongly typed value
    let result = Config::parse("[relay]\nchannel_capacity = \"many\"\n");

    // Then: ConfigError
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}

/// WHAT: A relative agent path resolves next to the executable
/// WHY: Launching from another working directory must still find the module
#[test]
fn given_relative_module_path_when_resolving_then_joined_to_exe_dir() {
    // Given: The default relative path and an executable directory
    let config = Config::default();
    let exe_dir = std::env::temp_dir().join("remote-tunes-bin");

    // When: Resolving
    let resolved = config.resolve_module_path(Some(&exe_dir));

    // Then: Joined
    assert_eq!(resolved, exe_dir.join(DEFAULT_MODULE_PATH));
}

/// WHAT: An absolute agent path is used as configured
/// WHY: Users may install the module elsewhere
#[test]
fn given_absolute_module_path_when_resolving_then_unchanged() {
    // Given: An absolute module path
    let absolute = std::env::temp_dir().join("hooks").join("agent.dll");
    let mut config = Config::default();
    config.agent.module_path = absolute.clone();

    // When: Resolving against some executable directory
    let resolved = config.resolve_module_path(Some(Path::new("ignored")));

    // Then: Unchanged
    assert_eq!(resolved, absolute);
}

/// WHAT: Without an executable directory, the configured path is used
/// WHY: Resolution must not fail when the OS cannot report the exe path
#[test]
fn given_unknown_exe_dir_when_resolving_then_configured_path_used() {
    let config = Config::default();

    assert_eq!(
        config.resolve_module_path(None),
        PathBuf::from(DEFAULT_MODULE_PATH)
    );
}

/// WHAT: A zero channel capacity is raised to one
/// WHY: The relay channel needs at least one slot
#[test]
fn given_zero_capacity_when_reading_effective_capacity_then_one() {
    let relay = RelayConfig {
        channel_capacity: 0,
    };

    assert_eq!(relay.effective_capacity(), 1);
    assert_eq!(RelayConfig::default().effective_capacity(), DEFAULT_CHANNEL_CAPACITY);
}
