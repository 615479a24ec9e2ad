//! Hook agent: the systemwide shell hook and its forwarding logic.
//!
//! The agent is loaded into every process of the desktop session once its
//! hook is installed. [`relay_notification`] is the part that runs in those
//! foreign processes; [`HookAgent`] is the install/uninstall state held by
//! the copy living in the controller's process.

use crate::{
    CommandPoster, CoreResult, MediaCommand, Registration, RelayDestination, RelayMessage,
    RelayRegistry,
    command::{SHELL_APPCOMMAND, app_command_from_lparam},
};

use tracing::{debug, info, instrument, warn};

/// Entry point contract exported by the agent module.
pub mod abi {
    use std::ffi::CStr;

    /// Version of the entry point set below. Bump on any signature change.
    pub const HOOK_ABI_VERSION: u32 = 1;

    /// `extern "system" fn() -> u32`
    pub const ABI_VERSION_SYMBOL: &CStr = c"HookAbiVersion";
    /// `extern "system" fn(destination) -> BOOL`
    pub const INSTALL_HOOK_SYMBOL: &CStr = c"InstallHook";
    /// `extern "system" fn()`
    pub const REMOVE_HOOK_SYMBOL: &CStr = c"RemoveHook";
    /// `extern "system" fn() -> BOOL`
    pub const RELEASE_DESTINATION_SYMBOL: &CStr = c"ReleaseDestination";
}

/// A shell hook notification as seen by the hook procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellNotification {
    /// `HSHELL_APPCOMMAND` with its extracted command code.
    AppCommand {
        /// App-command code (`GET_APPCOMMAND_LPARAM`).
        code: u16,
    },
    /// Any other shell notification.
    Other {
        /// Raw hook code.
        code: i32,
    },
}

impl ShellNotification {
    /// Classify the raw `(nCode, lParam)` pair handed to a shell hook.
    pub fn from_raw(code: i32, lparam: isize) -> Self {
        if code == SHELL_APPCOMMAND {
            ShellNotification::AppCommand {
                code: app_command_from_lparam(lparam),
            }
        } else {
            ShellNotification::Other { code }
        }
    }

    /// The transport command carried by this notification, if recognised.
    pub fn media_command(&self) -> Option<MediaCommand> {
        match *self {
            ShellNotification::AppCommand { code } => MediaCommand::from_app_command(code),
            ShellNotification::Other { .. } => None,
        }
    }
}

/// What the hook procedure does with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Forwarded; stop propagation down the hook chain.
    Consumed,
    /// Hand to the next hook unchanged.
    PassThrough,
}

/// OS seam for installing the systemwide shell hook.
pub trait ShellHook {
    /// Handle to an installed hook.
    type Handle;

    /// Install the hook for the whole desktop session.
    fn install(&self) -> CoreResult<Self::Handle>;

    /// Remove a previously installed hook.
    fn uninstall(&self, handle: Self::Handle);
}

/// Hook procedure body.
///
/// Called from any thread of any process in the session. Does no blocking
/// work and never touches an unset destination.
pub fn relay_notification<P: CommandPoster + ?Sized>(
    registry: &RelayRegistry,
    poster: &P,
    notification: ShellNotification,
) -> NotificationOutcome {
    let Some(command) = notification.media_command() else {
        return NotificationOutcome::PassThrough;
    };

    let Some(destination) = registry.destination() else {
        return NotificationOutcome::PassThrough;
    };

    // Outcome ignored: a dead destination loses the command.
    let _ = poster.post(destination, RelayMessage::MediaCommand(command));
    NotificationOutcome::Consumed
}

/// Install state of the agent in the controller's process.
pub struct HookAgent<'r, H: ShellHook, P: CommandPoster> {
    registry: &'r RelayRegistry,
    hook: H,
    poster: P,
    handle: Option<H::Handle>,
    registration: Option<Registration>,
}

impl<'r, H: ShellHook, P: CommandPoster> HookAgent<'r, H, P> {
    /// Create an uninstalled agent publishing into `registry`.
    pub const fn new(registry: &'r RelayRegistry, hook: H, poster: P) -> Self {
        Self {
            registry,
            hook,
            poster,
            handle: None,
            registration: None,
        }
    }

    /// Whether the shell hook is installed.
    pub fn is_installed(&self) -> bool {
        self.handle.is_some()
    }

    /// Registration published by the last successful install.
    pub fn registration(&self) -> Option<Registration> {
        self.registration
    }

    /// Install the shell hook and publish `destination`.
    ///
    /// No-op when already installed. On failure nothing is published and
    /// the agent stays uninstalled.
    #[instrument(skip(self))]
    pub fn install(&mut self, destination: RelayDestination) -> CoreResult<()> {
        if self.handle.is_some() {
            debug!("Shell hook already installed");
            return Ok(());
        }

        let handle = self.hook.install()?;
        self.handle = Some(handle);

        let current = self.registry.current();
        if let Some(current) = current.filter(|c| Some(*c) != self.registration) {
            warn!(
                destination = current.destination().get(),
                generation = current.generation(),
                "Replacing destination published by another controller"
            );
        }

        let registration = self.registry.register(destination);
        self.registration = Some(registration);

        info!(
            destination = registration.destination().get(),
            generation = registration.generation(),
            "Shell hook installed"
        );

        Ok(())
    }

    /// Remove the shell hook if installed.
    ///
    /// The published destination is left in place; see
    /// [`HookAgent::release_destination`].
    #[instrument(skip(self))]
    pub fn uninstall(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.hook.uninstall(handle);
            info!("Shell hook removed");
        }
    }

    /// Clear the published destination if this agent's registration is
    /// still the current one.
    #[instrument(skip(self))]
    pub fn release_destination(&mut self) -> bool {
        let Some(registration) = self.registration.take() else {
            return false;
        };

        let released = self.registry.release(&registration);
        if released {
            info!(generation = registration.generation(), "Relay destination released");
        } else {
            debug!(
                generation = registration.generation(),
                "Relay destination superseded, left in place"
            );
        }
        released
    }

    /// Handle a notification delivered to this process's hook.
    ///
    /// When the hook is not installed the OS would not call us at all, so
    /// the notification passes through untouched.
    pub fn on_notification(&self, notification: ShellNotification) -> NotificationOutcome {
        if self.handle.is_none() {
            return NotificationOutcome::PassThrough;
        }
        relay_notification(self.registry, &self.poster, notification)
    }
}
