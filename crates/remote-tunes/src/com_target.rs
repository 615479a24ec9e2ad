//! Media target reached through a COM automation server.
//!
//! Methods are invoked late-bound through `IDispatch` by name, so any
//! player exposing `Play`, `Pause`, `Stop`, `PreviousTrack` and
//! `NextTrack` on its application object works.

use remote_tunes_core::{MediaCommand, MediaTarget, MediaTargetConnector, TargetError, TargetResult};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use tracing::{debug, instrument};
use windows::{
    Win32::System::Com::{
        CLSCTX_LOCAL_SERVER, CLSIDFromProgID, CoCreateInstance, DISPATCH_METHOD, DISPPARAMS,
        IDispatch,
    },
    core::{GUID, HSTRING, PCWSTR},
};

const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// Connects to a running (or launchable) automation server by ProgID.
pub struct ComTargetConnector {
    prog_id: String,
}

impl ComTargetConnector {
    /// Connector for `prog_id`, such as `iTunes.Application`.
    pub fn new(prog_id: impl Into<String>) -> Self {
        Self {
            prog_id: prog_id.into(),
        }
    }

    #[track_caller]
    fn connect_failed(&self, e: windows::core::Error) -> TargetError {
        TargetError::ConnectFailed {
            target: self.prog_id.clone(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl MediaTargetConnector for ComTargetConnector {
    type Target = ComMediaTarget;

    fn target_name(&self) -> &str {
        &self.prog_id
    }

    #[instrument(skip(self), fields(prog_id = %self.prog_id))]
    fn connect(&mut self) -> TargetResult<ComMediaTarget> {
        let prog_id = HSTRING::from(self.prog_id.as_str());

        let clsid = unsafe { CLSIDFromProgID(&prog_id) }.map_err(|e| self.connect_failed(e))?;
        let dispatch: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| self.connect_failed(e))?;

        debug!("Automation server instance created");

        Ok(ComMediaTarget {
            dispatch,
            dispids: HashMap::new(),
        })
    }
}

/// Handle to a player's application object.
///
/// Holds a COM reference; must stay on the apartment thread that created it.
pub struct ComMediaTarget {
    dispatch: IDispatch,
    dispids: HashMap<MediaCommand, i32>,
}

impl ComMediaTarget {
    #[track_caller]
    fn failed(command: MediaCommand, e: windows::core::Error) -> TargetError {
        TargetError::OperationFailed {
            command,
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    fn dispid(&mut self, command: MediaCommand) -> TargetResult<i32> {
        if let Some(id) = self.dispids.get(&command) {
            return Ok(*id);
        }

        let name = HSTRING::from(command.method_name());
        let names = [PCWSTR(name.as_ptr())];
        let mut id = 0i32;
        unsafe {
            self.dispatch.GetIDsOfNames(
                &GUID::zeroed(),
                names.as_ptr(),
                1,
                LOCALE_USER_DEFAULT,
                &mut id,
            )
        }
        .map_err(|e| Self::failed(command, e))?;

        self.dispids.insert(command, id);
        Ok(id)
    }

    fn invoke(&mut self, command: MediaCommand) -> TargetResult<()> {
        let id = self.dispid(command)?;
        let params = DISPPARAMS::default();

        unsafe {
            self.dispatch.Invoke(
                id,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                DISPATCH_METHOD,
                &params,
                None,
                None,
                None,
            )
        }
        .map_err(|e| Self::failed(command, e))
    }
}

impl MediaTarget for ComMediaTarget {
    fn play(&mut self) -> TargetResult<()> {
        self.invoke(MediaCommand::Play)
    }

    fn pause(&mut self) -> TargetResult<()> {
        self.invoke(MediaCommand::Pause)
    }

    fn stop(&mut self) -> TargetResult<()> {
        self.invoke(MediaCommand::Stop)
    }

    fn previous_track(&mut self) -> TargetResult<()> {
        self.invoke(MediaCommand::PreviousTrack)
    }

    fn next_track(&mut self) -> TargetResult<()> {
        self.invoke(MediaCommand::NextTrack)
    }
}
