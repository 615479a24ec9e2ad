use crate::MediaCommand;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Relay errors with source location tracking.
///
/// Covers the agent module lifecycle (load, symbol lookup, hook install).
/// Media target failures have their own [`TargetError`] because the
/// controller handles them differently (quiet retry instead of reporting).
#[derive(Error, Debug)]
pub enum RelayError {
    /// The hook agent module could not be loaded.
    #[error("Unable to load hook module {module}: {reason} {location}")]
    AgentLoadFailed {
        /// Path or name of the module.
        module: String,
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A required entry point is missing from the hook agent module.
    #[error("Hook module is missing entry point {symbol} {location}")]
    AgentEntryPointMissing {
        /// Name of the missing symbol.
        symbol: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The hook agent module speaks a different entry point version.
    #[error("Hook module ABI version {found} does not match expected {expected} {location}")]
    AgentAbiMismatch {
        /// Version this controller was built against.
        expected: u32,
        /// Version reported by the module.
        found: u32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS refused to install the systemwide shell hook.
    #[error("Could not install the global shell hook: {reason} {location}")]
    HookInstallFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Media target error surfaced through an operation that reports it.
    #[error("Media target error: {source} {location}")]
    Target {
        /// The underlying target error.
        #[source]
        source: TargetError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RelayError {
    /// Short message suitable for a desktop notification body.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::AgentLoadFailed { module, .. } => {
                format!("Unable to load hook module {}.", module)
            }
            RelayError::AgentEntryPointMissing { symbol, .. } => {
                format!("Unable to retrieve {} from hook module.", symbol)
            }
            RelayError::AgentAbiMismatch {
                expected, found, ..
            } => format!(
                "Hook module version {} does not match application version {}.",
                found, expected
            ),
            RelayError::HookInstallFailed { reason, .. } => {
                format!("Could not install the global message receiver hook ({}).", reason)
            }
            RelayError::Target { source, .. } => source.user_message(),
        }
    }
}

/// Errors talking to the automation-controlled media player.
#[derive(Error, Debug)]
pub enum TargetError {
    /// No handle could be acquired for the target application.
    #[error("Could not connect to media target {target}: {reason} {location}")]
    ConnectFailed {
        /// Registered identity of the target (e.g. a COM ProgID).
        target: String,
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An operation was requested while no handle is held.
    #[error("Media target is not connected {location}")]
    NotConnected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The target rejected or failed an operation.
    #[error("Media target failed {command}: {reason} {location}")]
    OperationFailed {
        /// Command that failed.
        command: MediaCommand,
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl TargetError {
    /// Build a [`TargetError::NotConnected`] at the caller's location.
    #[track_caller]
    pub fn not_connected() -> Self {
        TargetError::NotConnected {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short message suitable for a desktop notification body.
    pub fn user_message(&self) -> String {
        match self {
            TargetError::ConnectFailed { target, .. } => {
                format!("Could not connect to {}.", target)
            }
            TargetError::NotConnected { .. } => "Media player is not connected.".to_string(),
            TargetError::OperationFailed { command, .. } => {
                format!("Media player did not accept {}.", command)
            }
        }
    }
}

// Manual From<TargetError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<TargetError> for RelayError {
    #[track_caller]
    fn from(source: TargetError) -> Self {
        RelayError::Target {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RelayError`].
pub type Result<T> = StdResult<T, RelayError>;

/// Result type alias using [`TargetError`].
pub type TargetResult<T> = StdResult<T, TargetError>;
