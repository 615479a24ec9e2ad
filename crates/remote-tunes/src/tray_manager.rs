//! System tray icon with state-based updates.
//!
//! Shows whether the relay is enabled and offers Enable, Disable, About and
//! Quit. Enable and Disable behave as a radio pair.

use crate::{AppCommand, AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tray_icon::menu::{
    CheckMenuItem, IsMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem,
};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Menu item IDs, cloneable off the UI thread.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    enable: MenuId,
    disable: MenuId,
    about: MenuId,
    quit: MenuId,
}

impl TrayMenuIds {
    /// Command for a clicked menu item, if it is one of ours.
    pub fn command_for(&self, id: &MenuId) -> Option<AppCommand> {
        if *id == self.enable {
            Some(AppCommand::Enable)
        } else if *id == self.disable {
            Some(AppCommand::Disable)
        } else if *id == self.about {
            Some(AppCommand::About)
        } else if *id == self.quit {
            Some(AppCommand::Shutdown)
        } else {
            None
        }
    }

    /// Forward menu clicks to `command_tx` from a dedicated thread.
    ///
    /// `MenuEvent::receiver()` blocks without polling. The thread ends when
    /// the controller drops its command receiver.
    #[track_caller]
    pub fn spawn_forwarder(self, command_tx: mpsc::Sender<AppCommand>) -> AppResult<()> {
        std::thread::Builder::new()
            .name("tray-menu".to_string())
            .spawn(move || {
                let receiver = MenuEvent::receiver();
                while let Ok(event) = receiver.recv() {
                    let Some(cmd) = self.command_for(&event.id) else {
                        continue;
                    };
                    debug!(command = ?cmd, "Tray menu selection");
                    if command_tx.blocking_send(cmd).is_err() {
                        break;
                    }
                }
            })?;

        Ok(())
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    enable_item: CheckMenuItem,
    disable_item: CheckMenuItem,
    ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager showing the disabled state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let enable_item = CheckMenuItem::new("Enable", true, false, None);
        let disable_item = CheckMenuItem::new("Disable", true, true, None);
        let about_item = MenuItem::new("About", true, None);
        let quit_item = MenuItem::new("Quit", true, None);

        let ids = TrayMenuIds {
            enable: enable_item.id().clone(),
            disable: disable_item.id().clone(),
            about: about_item.id().clone(),
            quit: quit_item.id().clone(),
        };

        let separator = PredefinedMenuItem::separator();
        let items: [&dyn IsMenuItem; 5] = [
            &enable_item,
            &disable_item,
            &separator,
            &about_item,
            &quit_item,
        ];
        menu.append_items(&items).map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(TrayIconState::Disabled)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(TrayIconState::Disabled.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            enable_item,
            disable_item,
            ids,
        })
    }

    /// Update icon, tooltip and menu checks to `state`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let enabled = state == TrayIconState::Enabled;
        self.enable_item.set_checked(enabled);
        self.disable_item.set_checked(!enabled);

        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu item IDs for the click forwarder.
    pub fn menu_ids(&self) -> TrayMenuIds {
        self.ids.clone()
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Enabled => include_bytes!("../resources/icons/enabled.png"),
            TrayIconState::Disabled => include_bytes!("../resources/icons/disabled.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
