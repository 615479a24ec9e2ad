//! RemoteTunes: relays hardware media keys to a desktop media player.
//!
//! The main thread owns the tray icon and the `tao` event loop. A second
//! thread enters a COM apartment and runs the relay controller on a
//! single-threaded tokio runtime. A third thread pumps the relay window
//! that hook agents post to.

#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
// Off Windows only the platform-independent pieces build, for tests.
#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

#[cfg(target_os = "windows")]
mod agent_loader;
mod app;
mod app_command;
#[cfg(target_os = "windows")]
mod com_apartment;
#[cfg(target_os = "windows")]
mod com_target;
mod config;
mod error;
mod logging;
mod notifier;
#[cfg(target_os = "windows")]
mod relay_window;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
#[cfg(target_os = "windows")]
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    notifier::DesktopNotifier,
    tray_command::{TrayCommand, TrayHandle},
    tray_icon_state::TrayIconState,
};

#[cfg(target_os = "windows")]
pub(crate) use {
    agent_loader::DllAgentLoader, com_apartment::ComApartment, com_target::ComTargetConnector,
    relay_window::RelayWindow, tray_manager::TrayManager,
};

use tracing::error;

/// Application entry point.
fn main() {
    let _log_guard = logging::init();

    if let Err(e) = run() {
        error!(error = ?e, "RemoteTunes failed to start");
        std::process::exit(1);
    }
}

#[cfg(not(target_os = "windows"))]
fn run() -> AppResult<()> {
    Err(AppError::PlatformError {
        reason: "RemoteTunes relays Windows shell notifications and only runs on Windows"
            .to_string(),
        location: error_location::ErrorLocation::from(std::panic::Location::caller()),
    })
}

#[cfg(target_os = "windows")]
fn run() -> AppResult<()> {
    use crate::config::Config;

    use tao::{
        event::Event,
        event_loop::{ControlFlow, EventLoopBuilder},
    };
    use tokio::sync::mpsc;

    let config = Config::load()?;

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = TrayManager::new()?;

    let (command_tx, command_rx) = mpsc::channel(32);
    tray_manager.menu_ids().spawn_forwarder(command_tx)?;

    std::thread::Builder::new()
        .name("relay-controller".to_string())
        .spawn(move || {
            if let Err(e) = run_controller(config, command_rx, tray_proxy.clone()) {
                error!(error = ?e, "Relay controller failed");
                tray_proxy.post(TrayCommand::Shutdown);
            }
        })?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        if let Event::UserEvent(cmd) = event {
            match cmd {
                TrayCommand::SetState(state) => {
                    if let Err(e) = tray_manager.update_state(state) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::Shutdown => {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            }
        }
    })
}

/// Controller thread body: COM apartment, relay window, then the app loop.
///
/// Drop order matters: the app (and with it every COM reference) goes
/// before the relay window, and the apartment is left last.
#[cfg(target_os = "windows")]
fn run_controller(
    config: config::Config,
    command_rx: tokio::sync::mpsc::Receiver<AppCommand>,
    tray: tao::event_loop::EventLoopProxy<TrayCommand>,
) -> AppResult<()> {
    use remote_tunes_core::RelayController;

    let _apartment = ComApartment::enter()?;
    let (relay_window, relay_rx) = RelayWindow::spawn(config.relay.effective_capacity())?;

    let module_path = config.module_path();
    tracing::info!(module_path = ?module_path, prog_id = %config.target.prog_id, "Starting relay controller");

    let controller = RelayController::new(
        DllAgentLoader::new(module_path),
        ComTargetConnector::new(config.target.prog_id.as_str()),
        DesktopNotifier::new(config.behaviour.notify_errors),
        relay_window.destination()?,
    );

    let app = App {
        controller,
        relay_rx,
        command_rx,
        tray,
        enable_on_start: config.behaviour.enable_on_start,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    rt.block_on(app.run())?;

    drop(relay_window);
    Ok(())
}
