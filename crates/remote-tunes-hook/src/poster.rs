use remote_tunes_core::{CommandPoster, PostOutcome, RelayDestination, RelayMessage};
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::PostMessageW,
};

/// Posts relay messages to the destination window's queue.
///
/// `PostMessageW` returns as soon as the message is queued, so the hook
/// never waits on the controller.
pub(crate) struct WindowMessagePoster;

impl CommandPoster for WindowMessagePoster {
    fn post(&self, destination: RelayDestination, message: RelayMessage) -> PostOutcome {
        let (id, wparam) = message.to_window_message();
        let window = HWND(destination.get() as isize);

        // SAFETY: posting to an invalid window fails without side effects.
        match unsafe { PostMessageW(window, id, WPARAM(wparam), LPARAM(0)) } {
            Ok(()) => PostOutcome::Queued,
            Err(_) => PostOutcome::DroppedNoDestination,
        }
    }
}
