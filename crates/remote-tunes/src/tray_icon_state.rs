/// Tray icon states, mirroring whether the hook is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Hook installed; media keys are relayed.
    Enabled,
    /// Hook not installed.
    Disabled,
}

impl TrayIconState {
    /// State matching a hook install flag.
    pub fn from_hook_installed(installed: bool) -> Self {
        if installed {
            TrayIconState::Enabled
        } else {
            TrayIconState::Disabled
        }
    }

    /// Tooltip shown for this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Enabled => "RemoteTunes - Enabled",
            TrayIconState::Disabled => "RemoteTunes - Disabled",
        }
    }
}
