//! Relay controller: owns the hook agent module and the media target.
//!
//! Runs on a single event-loop thread. Nothing here is locked; the target
//! handle in particular is only touched from that thread.

use crate::{
    CoreResult, MediaCommand, MediaTarget, MediaTargetConnector, RelayDestination, RelayError,
    RelayMessage, TargetError,
};

use tracing::{debug, error, info, instrument, warn};

/// A loaded hook agent module.
pub trait HookModule {
    /// Install the systemwide hook and register `destination`.
    fn install_hook(&mut self, destination: RelayDestination) -> CoreResult<()>;

    /// Remove the systemwide hook.
    fn remove_hook(&mut self);

    /// Clear the registered destination if it is still ours.
    fn release_destination(&mut self) -> bool;
}

/// Loads the hook agent module and validates its entry points.
pub trait AgentLoader {
    /// Module type produced by a successful load.
    type Module: HookModule;

    /// Load and validate the module.
    fn load(&mut self) -> CoreResult<Self::Module>;
}

/// Reports conditions to the person at the desktop.
pub trait UserNotifier {
    /// Show `body` under the heading `summary`.
    fn notify(&self, summary: &str, body: &str);
}

/// Lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No target connection, no hook.
    Idle,
    /// Target handle held, hook not installed.
    Connected,
    /// Hook installed.
    Active,
}

/// Result of relaying one command to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// First attempt succeeded.
    Delivered,
    /// First attempt failed; succeeded after reconnecting.
    DeliveredAfterReconnect,
    /// Both attempts failed (or no connection could be made).
    Dropped,
}

/// Owns the hook agent lifecycle and the media target connection.
pub struct RelayController<L: AgentLoader, C: MediaTargetConnector, N: UserNotifier> {
    loader: L,
    connector: C,
    notifier: N,
    destination: RelayDestination,
    module: Option<L::Module>,
    target: Option<C::Target>,
    hook_installed: bool,
    shut_down: bool,
}

impl<L: AgentLoader, C: MediaTargetConnector, N: UserNotifier> RelayController<L, C, N> {
    /// Create an idle controller delivering to `destination`.
    pub fn new(loader: L, connector: C, notifier: N, destination: RelayDestination) -> Self {
        Self {
            loader,
            connector,
            notifier,
            destination,
            module: None,
            target: None,
            hook_installed: false,
            shut_down: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        if self.hook_installed {
            ControllerState::Active
        } else if self.target.is_some() {
            ControllerState::Connected
        } else {
            ControllerState::Idle
        }
    }

    /// Whether a target handle is held.
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// Whether the systemwide hook is installed.
    pub fn is_hook_installed(&self) -> bool {
        self.hook_installed
    }

    /// Destination registered with the agent.
    pub fn destination(&self) -> RelayDestination {
        self.destination
    }

    /// Notifier used for user-visible reports.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Acquire a handle to the media target, reporting failure to the user.
    ///
    /// On failure the handle is left unset; the host keeps running.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn connect_target(&mut self) -> CoreResult<()> {
        match self.connector.connect() {
            Ok(target) => {
                self.target = Some(target);
                info!(media_target = self.connector.target_name(), "Media target connected");
                Ok(())
            }
            Err(e) => {
                self.target = None;
                error!(media_target = self.connector.target_name(), error = ?e, "Media target connection failed");
                self.notifier.notify("Error", &e.user_message());
                Err(e.into())
            }
        }
    }

    /// Connect (if needed), load the agent (if needed) and install the hook.
    ///
    /// Idempotent. A failed target connection is reported but does not stop
    /// the hook from being installed; the target is reconnected lazily.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn enable(&mut self) -> CoreResult<()> {
        if self.target.is_none() {
            // Reported inside; command dispatch will retry.
            let _ = self.connect_target();
        }

        if self.module.is_none() {
            let module = self.loader.load().map_err(|e| self.report(e))?;
            self.module = Some(module);
            debug!("Hook module loaded");
        }

        if self.hook_installed {
            debug!("Hook already installed");
            return Ok(());
        }

        let destination = self.destination;
        let installed = match self.module.as_mut() {
            Some(module) => module.install_hook(destination),
            None => return Ok(()),
        };
        installed.map_err(|e| self.report(e))?;

        self.hook_installed = true;
        self.shut_down = false;
        info!(destination = destination.get(), "Relay enabled");

        Ok(())
    }

    /// Remove the hook if installed. The module stays loaded.
    #[instrument(skip(self))]
    pub fn disable(&mut self) {
        if !self.hook_installed {
            debug!("Hook not installed");
            return;
        }

        if let Some(module) = self.module.as_mut() {
            module.remove_hook();
        }
        self.hook_installed = false;
        info!("Relay disabled");
    }

    /// Relay one forwarded command to the media target.
    ///
    /// A failed call (or a missing handle) triggers one reconnect and one
    /// retry. A failed reconnect is reported to the user; a failed retry
    /// drops the command silently.
    #[instrument(skip(self))]
    pub fn handle_forwarded_command(&mut self, command: MediaCommand) -> DispatchOutcome {
        let first = match self.target.as_mut() {
            Some(target) => target.execute(command),
            None => Err(TargetError::not_connected()),
        };

        let Err(first_error) = first else {
            debug!(command = %command, "Command delivered");
            return DispatchOutcome::Delivered;
        };

        warn!(command = %command, error = ?first_error, "Command failed, reconnecting");
        self.target = None;

        // A failed reconnect is reported like any other connection attempt.
        if self.connect_target().is_err() {
            warn!(command = %command, "Reconnect failed, command dropped");
            return DispatchOutcome::Dropped;
        }

        let retried = match self.target.as_mut() {
            Some(target) => target.execute(command),
            None => Err(TargetError::not_connected()),
        };

        match retried {
            Ok(()) => {
                info!(command = %command, "Command delivered after reconnect");
                DispatchOutcome::DeliveredAfterReconnect
            }
            Err(e) => {
                warn!(command = %command, error = ?e, "Retry failed, command dropped");
                DispatchOutcome::Dropped
            }
        }
    }

    /// Unwrap a relay message and dispatch it.
    pub fn handle_relay_message(&mut self, message: RelayMessage) -> DispatchOutcome {
        match message {
            RelayMessage::MediaCommand(command) => self.handle_forwarded_command(command),
        }
    }

    /// Tear down for process exit: disable, release the shared destination
    /// and drop the target handle. Idempotent.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        self.disable();

        let released = self
            .module
            .as_mut()
            .is_some_and(|module| module.release_destination());
        if !released {
            debug!("Shared destination not released (never registered or superseded)");
        }

        self.target = None;
        self.shut_down = true;
        info!("Relay controller shut down");
    }

    fn report(&self, e: RelayError) -> RelayError {
        error!(error = ?e, "Relay operation failed");
        self.notifier.notify("Error", &e.user_message());
        e
    }
}

impl<L: AgentLoader, C: MediaTargetConnector, N: UserNotifier> Drop
    for RelayController<L, C, N>
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
