use crate::{AppCommand, AppResult, TrayCommand, TrayHandle, TrayIconState};

use remote_tunes_core::{
    AgentLoader, MediaTargetConnector, RelayController, RelayReceiver, UserNotifier,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// Controller thread state.
///
/// Runs on a single-threaded runtime so the media target handle never
/// leaves the thread that created it. Tray updates go back to the main
/// thread through `tray` because `TrayIcon` is `!Send`.
pub struct App<L: AgentLoader, C: MediaTargetConnector, N: UserNotifier, T: TrayHandle> {
    pub(crate) controller: RelayController<L, C, N>,
    pub(crate) relay_rx: RelayReceiver,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) tray: T,
    pub(crate) enable_on_start: bool,
}

impl<L, C, N, T> App<L, C, N, T>
where
    L: AgentLoader,
    C: MediaTargetConnector,
    N: UserNotifier,
    T: TrayHandle,
{
    /// Run the controller event loop until shutdown.
    ///
    /// Pending media commands are drained before menu commands, so keys
    /// pressed before Quit still reach the target.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("RemoteTunes starting");

        if self.enable_on_start {
            self.enable_and_log();
        } else {
            self.publish_state();
        }

        loop {
            tokio::select! {
                biased;

                Some(message) = self.relay_rx.recv() => {
                    let outcome = self.controller.handle_relay_message(message);
                    debug!(kind = message.kind(), outcome = ?outcome, "Relay message handled");
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Enable => self.enable_and_log(),
                        AppCommand::Disable => self.disable(),
                        AppCommand::About => self.about(),
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.controller.shutdown();
        self.tray.post(TrayCommand::Shutdown);
        info!("RemoteTunes shut down successfully");

        Ok(())
    }

    /// Enable the relay and publish the resulting tray state.
    ///
    /// The controller has already notified the user when this fails.
    pub(crate) fn enable(&mut self) -> AppResult<()> {
        let enabled = self.controller.enable();
        self.publish_state();
        enabled?;
        Ok(())
    }

    fn enable_and_log(&mut self) {
        if let Err(e) = self.enable() {
            error!(error = ?e, "Failed to enable relay");
        }
    }

    fn disable(&mut self) {
        self.controller.disable();
        self.publish_state();
    }

    fn about(&self) {
        let text = about_text();
        info!(about = %text, "About requested");
        self.controller.notifier().notify("About RemoteTunes", &text);
    }

    fn publish_state(&self) {
        let state = TrayIconState::from_hook_installed(self.controller.is_hook_installed());
        self.tray.post(TrayCommand::SetState(state));
    }
}

/// Product name, version and pointer width of this build.
pub(crate) fn about_text() -> String {
    let width = if cfg!(target_pointer_width = "64") {
        "64-bit"
    } else {
        "32-bit"
    };
    format!("RemoteTunes, Version {} ({})", env!("CARGO_PKG_VERSION"), width)
}
