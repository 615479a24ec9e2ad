//! RemoteTunes Core Library
//!
//! Relays hardware media keys from a systemwide shell hook to a background
//! controller, which commands an automation-controlled media player.
//!
//! The crate is platform-independent: the OS pieces (shell hook, message
//! posting, module loading, the automation link) sit behind the traits
//! [`ShellHook`], [`CommandPoster`], [`AgentLoader`] and
//! [`MediaTargetConnector`].
//!
//! # Example
//!
//! ```no_run
//! use remote_tunes_core::{
//!     HookAgent, NotificationOutcome, RelayDestination, RelayRegistry,
//!     ShellHook, ShellNotification, CoreResult, relay_channel,
//! };
//!
//! struct NullHook;
//!
//! impl ShellHook for NullHook {
//!     type Handle = ();
//!     fn install(&self) -> CoreResult<()> { Ok(()) }
//!     fn uninstall(&self, _handle: ()) {}
//! }
//!
//! fn main() -> CoreResult<()> {
//!     static REGISTRY: RelayRegistry = RelayRegistry::new();
//!
//!     let Some(destination) = RelayDestination::new(0x1234) else {
//!         return Ok(());
//!     };
//!     let (sender, mut receiver) = relay_channel(destination, 8);
//!     let mut agent = HookAgent::new(&REGISTRY, NullHook, sender);
//!
//!     agent.install(destination)?;
//!
//!     // HSHELL_APPCOMMAND carrying APPCOMMAND_MEDIA_NEXTTRACK (11).
//!     let outcome = agent.on_notification(ShellNotification::from_raw(12, 11 << 16));
//!     assert_eq!(outcome, NotificationOutcome::Consumed);
//!     println!("Relayed: {:?}", receiver.try_recv());
//!     Ok(())
//! }
//! ```

mod agent;
mod command;
mod controller;
mod error;
mod registry;
mod relay;
mod target;

pub use {
    agent::{HookAgent, NotificationOutcome, ShellHook, ShellNotification, abi, relay_notification},
    command::{MediaCommand, RelayMessage, SHELL_APPCOMMAND, app_command_from_lparam},
    controller::{
        AgentLoader, ControllerState, DispatchOutcome, HookModule, RelayController, UserNotifier,
    },
    error::{RelayError, Result as CoreResult, TargetError, TargetResult},
    registry::{Registration, RelayRegistry},
    relay::{
        CommandPoster, PostOutcome, RelayDestination, RelayReceiver, RelaySender, relay_channel,
    },
    target::{MediaTarget, MediaTargetConnector},
};

#[cfg(test)]
mod tests;
