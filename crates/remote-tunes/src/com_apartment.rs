use crate::{AppError, AppResult};

use std::{marker::PhantomData, panic::Location};

use error_location::ErrorLocation;
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize};

/// RAII guard for a single-threaded COM apartment on the current thread.
///
/// Every COM object created on the thread must be released before the
/// guard drops. Not `Send`: the apartment belongs to the thread that
/// entered it.
pub struct ComApartment {
    _thread_bound: PhantomData<*const ()>,
}

impl ComApartment {
    /// Enter a single-threaded apartment.
    #[track_caller]
    pub(crate) fn enter() -> AppResult<Self> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.map_err(|e| {
            AppError::PlatformError {
                reason: format!("Failed to initialise COM: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(Self {
            _thread_bound: PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}
