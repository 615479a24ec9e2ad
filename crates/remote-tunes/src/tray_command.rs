use crate::TrayIconState;

/// Commands sent from the controller thread to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Update the tray icon and menu checks to a new state.
    SetState(TrayIconState),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}

/// Delivers [`TrayCommand`]s to whichever thread owns the tray.
pub trait TrayHandle {
    /// Queue `command`. A closed tray is ignored.
    fn post(&self, command: TrayCommand);
}

impl TrayHandle for std::sync::mpsc::Sender<TrayCommand> {
    fn post(&self, command: TrayCommand) {
        let _ = self.send(command);
    }
}

#[cfg(target_os = "windows")]
impl TrayHandle for tao::event_loop::EventLoopProxy<TrayCommand> {
    fn post(&self, command: TrayCommand) {
        let _ = self.send_event(command);
    }
}
