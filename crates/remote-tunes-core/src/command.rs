//! Media transport commands and their wire encoding.
//!
//! The shell reports hardware media keys as `WM_APPCOMMAND` codes. Only the
//! five transport commands below are relayed; everything else (volume keys,
//! browser keys, the play/pause toggle) is left to other listeners.

use std::fmt;

/// `HSHELL_APPCOMMAND`: shell hook code carrying an application command.
pub const SHELL_APPCOMMAND: i32 = 12;

/// Device bits packed into the high word of an app-command `lParam`.
const FAPPCOMMAND_MASK: u16 = 0xF000;

const APPCOMMAND_MEDIA_NEXTTRACK: u16 = 11;
const APPCOMMAND_MEDIA_PREVIOUSTRACK: u16 = 12;
const APPCOMMAND_MEDIA_STOP: u16 = 13;
const APPCOMMAND_MEDIA_PLAY: u16 = 46;
const APPCOMMAND_MEDIA_PAUSE: u16 = 47;

/// `WM_APP` base of the application-private window message range.
const WM_APP: u32 = 0x8000;

/// Extract the command code from an app-command `lParam`.
///
/// Equivalent of `GET_APPCOMMAND_LPARAM`: high word with the device bits
/// masked off.
pub fn app_command_from_lparam(lparam: isize) -> u16 {
    (((lparam as usize) >> 16) as u16) & !FAPPCOMMAND_MASK
}

/// A media transport command recognised by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCommand {
    /// Start playback.
    Play,
    /// Pause playback.
    Pause,
    /// Stop playback.
    Stop,
    /// Skip to the previous track.
    PreviousTrack,
    /// Skip to the next track.
    NextTrack,
}

impl MediaCommand {
    /// Every recognised command.
    pub const ALL: [MediaCommand; 5] = [
        MediaCommand::Play,
        MediaCommand::Pause,
        MediaCommand::Stop,
        MediaCommand::PreviousTrack,
        MediaCommand::NextTrack,
    ];

    /// Map an app-command code to a transport command.
    ///
    /// Returns `None` for every code outside the five transport commands.
    pub fn from_app_command(code: u16) -> Option<Self> {
        match code {
            APPCOMMAND_MEDIA_PLAY => Some(MediaCommand::Play),
            APPCOMMAND_MEDIA_PAUSE => Some(MediaCommand::Pause),
            APPCOMMAND_MEDIA_STOP => Some(MediaCommand::Stop),
            APPCOMMAND_MEDIA_PREVIOUSTRACK => Some(MediaCommand::PreviousTrack),
            APPCOMMAND_MEDIA_NEXTTRACK => Some(MediaCommand::NextTrack),
            _ => None,
        }
    }

    /// The app-command code for this command.
    pub fn app_command(self) -> u16 {
        match self {
            MediaCommand::Play => APPCOMMAND_MEDIA_PLAY,
            MediaCommand::Pause => APPCOMMAND_MEDIA_PAUSE,
            MediaCommand::Stop => APPCOMMAND_MEDIA_STOP,
            MediaCommand::PreviousTrack => APPCOMMAND_MEDIA_PREVIOUSTRACK,
            MediaCommand::NextTrack => APPCOMMAND_MEDIA_NEXTTRACK,
        }
    }

    /// Automation method name on the media target.
    pub fn method_name(self) -> &'static str {
        match self {
            MediaCommand::Play => "Play",
            MediaCommand::Pause => "Pause",
            MediaCommand::Stop => "Stop",
            MediaCommand::PreviousTrack => "PreviousTrack",
            MediaCommand::NextTrack => "NextTrack",
        }
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Message delivered from a hook agent to the relay destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMessage {
    /// A recognised media transport command.
    MediaCommand(MediaCommand),
}

impl RelayMessage {
    /// Window message id used when the destination is a window.
    pub const WINDOW_MESSAGE: u32 = WM_APP + 0x52;

    /// Message kind tag.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayMessage::MediaCommand(_) => "media-command",
        }
    }

    /// Encode as a `(message, wParam)` pair for a window-message post.
    pub fn to_window_message(self) -> (u32, usize) {
        match self {
            RelayMessage::MediaCommand(command) => {
                (Self::WINDOW_MESSAGE, usize::from(command.app_command()))
            }
        }
    }

    /// Decode a `(message, wParam)` pair received by the destination window.
    ///
    /// Unknown messages and unrecognised codes yield `None`.
    pub fn from_window_message(message: u32, wparam: usize) -> Option<Self> {
        if message != Self::WINDOW_MESSAGE {
            return None;
        }
        let code = u16::try_from(wparam).ok()?;
        MediaCommand::from_app_command(code).map(RelayMessage::MediaCommand)
    }
}
