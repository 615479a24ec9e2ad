//! RemoteTunes hook agent.
//!
//! Injected into every process of the desktop session once its `WH_SHELL`
//! hook is installed. Each copy watches for `HSHELL_APPCOMMAND`
//! notifications carrying media transport commands and posts them to the
//! relay window registered by the controller.
//!
//! The registry lives in the `.shared` section (made read/write/shared by
//! `build.rs`), so every copy sees the destination published by the
//! controller's copy. Everything else is per process.
//!
//! Exported entry points, looked up by name and checked against
//! [`remote_tunes_core::abi::HOOK_ABI_VERSION`] by the controller:
//!
//! - `HookAbiVersion() -> u32`
//! - `InstallHook(HWND) -> BOOL`
//! - `RemoveHook()`
//! - `ReleaseDestination() -> BOOL`

#[cfg(windows)]
mod poster;
#[cfg(windows)]
mod shell_hook;

#[cfg(windows)]
pub use exports::*;

#[cfg(windows)]
mod exports {
    use crate::{poster::WindowMessagePoster, shell_hook::WindowsShellHook};

    use std::{
        ffi::c_void,
        sync::{Mutex, PoisonError},
    };

    use remote_tunes_core::{HookAgent, RelayDestination, RelayRegistry, abi::HOOK_ABI_VERSION};
    use tracing::error;
    use windows::Win32::{
        Foundation::{BOOL, FALSE, HINSTANCE, HWND, TRUE},
        System::SystemServices::DLL_PROCESS_ATTACH,
    };

    /// Relay destination shared by every loaded copy of this module.
    #[unsafe(link_section = ".shared")]
    #[used]
    pub(crate) static SHARED_REGISTRY: RelayRegistry = RelayRegistry::new();

    type Agent = HookAgent<'static, WindowsShellHook, WindowMessagePoster>;

    /// Install state; only meaningful in the controller's process.
    ///
    /// `shell_proc` never goes through this agent: it runs in every hooked
    /// process, none of which called `InstallHook`, and relays via the
    /// shared registry directly. Interception stops when `RemoveHook`
    /// unhooks, so the agent only owns install, uninstall and release.
    static AGENT: Mutex<Option<Agent>> = Mutex::new(None);

    fn with_agent<R>(f: impl FnOnce(&mut Agent) -> R) -> R {
        let mut slot = AGENT.lock().unwrap_or_else(PoisonError::into_inner);
        let agent = slot.get_or_insert_with(|| {
            HookAgent::new(&SHARED_REGISTRY, WindowsShellHook, WindowMessagePoster)
        });
        f(agent)
    }

    /// Module entry point. Records this module's instance handle.
    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    pub extern "system" fn DllMain(module: HINSTANCE, reason: u32, _reserved: *mut c_void) -> BOOL {
        if reason == DLL_PROCESS_ATTACH {
            crate::shell_hook::set_module(module);
        }
        TRUE
    }

    /// Entry point version implemented by this module.
    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    pub extern "system" fn HookAbiVersion() -> u32 {
        HOOK_ABI_VERSION
    }

    /// Install the shell hook and register `relay_window` as destination.
    ///
    /// Returns `TRUE` when the hook is installed (including when it already
    /// was). On `FALSE`, the thread's last error describes the failure.
    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    pub extern "system" fn InstallHook(relay_window: HWND) -> BOOL {
        let Some(destination) = RelayDestination::new(relay_window.0 as usize) else {
            error!("InstallHook called without a relay window");
            return FALSE;
        };

        match with_agent(|agent| agent.install(destination)) {
            Ok(()) => TRUE,
            Err(e) => {
                error!(error = ?e, "Shell hook install failed");
                FALSE
            }
        }
    }

    /// Remove the shell hook if installed. The destination stays registered.
    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    pub extern "system" fn RemoveHook() {
        with_agent(|agent| agent.uninstall());
    }

    /// Clear the shared destination if this process registered the current one.
    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    pub extern "system" fn ReleaseDestination() -> BOOL {
        if with_agent(|agent| agent.release_destination()) {
            TRUE
        } else {
            FALSE
        }
    }
}
