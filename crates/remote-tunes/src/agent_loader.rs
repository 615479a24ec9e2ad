//! Loads the hook agent DLL and binds its versioned entry points.

use remote_tunes_core::{
    AgentLoader, CoreResult, HookModule, RelayDestination, RelayError,
    abi::{
        ABI_VERSION_SYMBOL, HOOK_ABI_VERSION, INSTALL_HOOK_SYMBOL, RELEASE_DESTINATION_SYMBOL,
        REMOVE_HOOK_SYMBOL,
    },
};

use std::{
    ffi::CStr,
    os::windows::ffi::OsStrExt,
    panic::Location,
    path::PathBuf,
};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};
use windows::{
    Win32::{
        Foundation::{BOOL, FreeLibrary, HMODULE, HWND},
        System::LibraryLoader::{GetProcAddress, LoadLibraryW},
    },
    core::{PCSTR, PCWSTR},
};

type RawProc = unsafe extern "system" fn() -> isize;
type AbiVersionFn = unsafe extern "system" fn() -> u32;
type InstallHookFn = unsafe extern "system" fn(HWND) -> BOOL;
type RemoveHookFn = unsafe extern "system" fn();
type ReleaseDestinationFn = unsafe extern "system" fn() -> BOOL;

/// Loads the agent module from a fixed path.
pub struct DllAgentLoader {
    path: PathBuf,
}

impl DllAgentLoader {
    /// Loader for the module at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AgentLoader for DllAgentLoader {
    type Module = DllHookModule;

    #[track_caller]
    #[instrument(skip(self), fields(module = %self.path.display()))]
    fn load(&mut self) -> CoreResult<DllHookModule> {
        let wide: Vec<u16> = self
            .path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let module = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| {
            RelayError::AgentLoadFailed {
                module: self.path.display().to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        match bind(module) {
            Ok(bound) => {
                info!("Hook agent module loaded");
                Ok(bound)
            }
            Err(e) => {
                if let Err(free) = unsafe { FreeLibrary(module) } {
                    warn!(error = %free, "Failed to unload rejected agent module");
                }
                Err(e)
            }
        }
    }
}

/// Resolve and validate every entry point of a loaded module.
#[track_caller]
fn bind(module: HMODULE) -> CoreResult<DllHookModule> {
    let version = lookup(module, ABI_VERSION_SYMBOL)?;
    // SAFETY: the exported symbol has this signature in every ABI version.
    let version: AbiVersionFn = unsafe { std::mem::transmute::<RawProc, AbiVersionFn>(version) };
    let found = unsafe { version() };
    if found != HOOK_ABI_VERSION {
        return Err(RelayError::AgentAbiMismatch {
            expected: HOOK_ABI_VERSION,
            found,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let install = lookup(module, INSTALL_HOOK_SYMBOL)?;
    let remove = lookup(module, REMOVE_HOOK_SYMBOL)?;
    let release = lookup(module, RELEASE_DESTINATION_SYMBOL)?;

    // SAFETY: signatures are fixed by the ABI version checked above.
    unsafe {
        Ok(DllHookModule {
            install: std::mem::transmute::<RawProc, InstallHookFn>(install),
            remove: std::mem::transmute::<RawProc, RemoveHookFn>(remove),
            release: std::mem::transmute::<RawProc, ReleaseDestinationFn>(release),
        })
    }
}

#[track_caller]
fn lookup(module: HMODULE, symbol: &CStr) -> CoreResult<RawProc> {
    unsafe { GetProcAddress(module, PCSTR(symbol.as_ptr().cast())) }.ok_or_else(|| {
        RelayError::AgentEntryPointMissing {
            symbol: symbol.to_string_lossy().into_owned(),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}

/// A loaded agent module.
///
/// Never unloaded: other processes may still be running its hook procedure
/// while the system tears the hook down.
pub struct DllHookModule {
    install: InstallHookFn,
    remove: RemoveHookFn,
    release: ReleaseDestinationFn,
}

impl HookModule for DllHookModule {
    #[track_caller]
    fn install_hook(&mut self, destination: RelayDestination) -> CoreResult<()> {
        let installed = unsafe { (self.install)(HWND(destination.get() as isize)) };
        if installed.as_bool() {
            Ok(())
        } else {
            Err(RelayError::HookInstallFailed {
                reason: windows::core::Error::from_win32().to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    fn remove_hook(&mut self) {
        unsafe { (self.remove)() };
    }

    fn release_destination(&mut self) -> bool {
        unsafe { (self.release)() }.as_bool()
    }
}
