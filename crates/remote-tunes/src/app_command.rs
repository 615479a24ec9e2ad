/// Commands sent from the tray menu to the controller thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Install the hook and start relaying.
    Enable,
    /// Remove the hook; media keys reach their usual handlers again.
    Disable,
    /// Show the product name, version and pointer width.
    About,
    /// Request application shutdown.
    Shutdown,
}
