//! `WH_SHELL` hook installation and the hook procedure.

use crate::{exports::SHARED_REGISTRY, poster::WindowMessagePoster};

use std::{
    panic::Location,
    sync::atomic::{AtomicIsize, Ordering},
};

use error_location::ErrorLocation;
use remote_tunes_core::{
    CoreResult, NotificationOutcome, RelayError, ShellHook, ShellNotification, relay_notification,
};
use tracing::warn;
use windows::Win32::{
    Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM},
    UI::WindowsAndMessaging::{CallNextHookEx, HHOOK, SetWindowsHookExW, UnhookWindowsHookEx, WH_SHELL},
};

/// Instance handle of this module, recorded at process attach.
static MODULE: AtomicIsize = AtomicIsize::new(0);

pub(crate) fn set_module(module: HINSTANCE) {
    MODULE.store(module.0, Ordering::Release);
}

/// Systemwide shell hook backed by this module's [`shell_proc`].
pub(crate) struct WindowsShellHook;

impl ShellHook for WindowsShellHook {
    type Handle = HHOOK;

    #[track_caller]
    fn install(&self) -> CoreResult<HHOOK> {
        let module = HINSTANCE(MODULE.load(Ordering::Acquire));

        // SAFETY: `shell_proc` lives as long as the module, which the
        // controller never unloads while the hook is installed.
        unsafe { SetWindowsHookExW(WH_SHELL, Some(shell_proc), module, 0) }.map_err(|e| {
            RelayError::HookInstallFailed {
                reason: format!("SetWindowsHookExW: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    fn uninstall(&self, handle: HHOOK) {
        // SAFETY: `handle` came from `install` and is removed only once.
        if let Err(e) = unsafe { UnhookWindowsHookEx(handle) } {
            warn!(error = %e, "UnhookWindowsHookEx failed");
        }
    }
}

/// Shell hook procedure. Runs in every process of the session.
unsafe extern "system" fn shell_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let notification = ShellNotification::from_raw(code, lparam.0);

    match relay_notification(&SHARED_REGISTRY, &WindowMessagePoster, notification) {
        NotificationOutcome::Consumed => LRESULT(1),
        // SAFETY: arguments are passed through unchanged.
        NotificationOutcome::PassThrough => unsafe { CallNextHookEx(None, code, wparam, lparam) },
    }
}
