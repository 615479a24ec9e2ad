//! Message-only window that receives commands posted by hook agents.
//!
//! The window lives on its own thread with a plain message pump. Its
//! procedure decodes relay messages and hands them to the controller
//! through a bounded channel; it never blocks.

use crate::{AppError, AppResult};

use remote_tunes_core::{RelayDestination, RelayMessage, RelayReceiver, RelaySender, relay_channel};

use std::{cell::RefCell, panic::Location, sync::mpsc, thread::JoinHandle};

use error_location::ErrorLocation;
use tracing::{debug, error, info, warn};
use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            ChangeWindowMessageFilterEx, CreateWindowExW, DefWindowProcW, DestroyWindow,
            DispatchMessageW, GetMessageW, HMENU, HWND_MESSAGE, MSG, MSGFLT_ALLOW,
            PostMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, WINDOW_EX_STYLE,
            WINDOW_STYLE, WM_CLOSE, WM_DESTROY, WNDCLASSW,
        },
    },
    core::w,
};

thread_local! {
    static RELAY_SENDER: RefCell<Option<RelaySender>> = const { RefCell::new(None) };
}

type Ready = AppResult<(isize, RelayReceiver)>;

/// Owns the relay window thread. Dropping it closes the window.
pub struct RelayWindow {
    hwnd: isize,
    thread: Option<JoinHandle<()>>,
}

impl RelayWindow {
    /// Create the window on a new thread and return the receiving end of
    /// its relay channel.
    #[track_caller]
    pub(crate) fn spawn(capacity: usize) -> AppResult<(Self, RelayReceiver)> {
        let (ready_tx, ready_rx) = mpsc::channel::<Ready>();

        let thread = std::thread::Builder::new()
            .name("relay-window".to_string())
            .spawn(move || pump(capacity, ready_tx))?;

        let (hwnd, receiver) = ready_rx.recv().map_err(|e| AppError::PlatformError {
            reason: format!("Relay window thread exited before reporting: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

        info!(hwnd, "Relay window created");

        Ok((
            Self {
                hwnd,
                thread: Some(thread),
            },
            receiver,
        ))
    }

    /// Destination hook agents post to.
    #[track_caller]
    pub(crate) fn destination(&self) -> AppResult<RelayDestination> {
        RelayDestination::new(self.hwnd as usize).ok_or_else(|| AppError::PlatformError {
            reason: "Relay window handle is null".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Drop for RelayWindow {
    fn drop(&mut self) {
        if let Err(e) = unsafe { PostMessageW(HWND(self.hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) } {
            warn!(error = %e, "Failed to close relay window");
            return;
        }
        if let Some(Err(_)) = self.thread.take().map(JoinHandle::join) {
            error!("Relay window thread panicked");
        }
        debug!("Relay window closed");
    }
}

fn pump(capacity: usize, ready_tx: mpsc::Sender<Ready>) {
    let hwnd = match create_window() {
        Ok(hwnd) => hwnd,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let Some(destination) = RelayDestination::new(hwnd.0 as usize) else {
        let _ = ready_tx.send(Err(AppError::PlatformError {
            reason: "Relay window handle is null".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }));
        return;
    };

    let (sender, receiver) = relay_channel(destination, capacity);
    RELAY_SENDER.with(|slot| *slot.borrow_mut() = Some(sender));

    if ready_tx.send(Ok((hwnd.0, receiver))).is_err() {
        let _ = unsafe { DestroyWindow(hwnd) };
    }

    let mut msg = MSG::default();
    // GetMessageW returns -1 on error and 0 on WM_QUIT.
    while unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            let _ = DispatchMessageW(&msg);
        }
    }

    RELAY_SENDER.with(|slot| slot.borrow_mut().take());
}

#[track_caller]
fn create_window() -> AppResult<HWND> {
    let module = unsafe { GetModuleHandleW(None) }.map_err(|e| AppError::PlatformError {
        reason: format!("Failed to get module handle: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let instance = HINSTANCE(module.0);
    let class_name = w!("RemoteTunesRelayWindow");

    let class = WNDCLASSW {
        lpfnWndProc: Some(relay_window_proc),
        hInstance: instance,
        lpszClassName: class_name,
        ..Default::default()
    };

    if unsafe { RegisterClassW(&class) } == 0 {
        return Err(AppError::PlatformError {
            reason: format!(
                "Failed to register relay window class: {}",
                windows::core::Error::from_win32()
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            w!("RemoteTunes relay"),
            WINDOW_STYLE::default(),
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            HMENU::default(),
            instance,
            None,
        )
    };

    if hwnd == HWND::default() {
        return Err(AppError::PlatformError {
            reason: format!(
                "Failed to create relay window: {}",
                windows::core::Error::from_win32()
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // Agents in lower-integrity processes must still be able to post to us.
    if let Err(e) = unsafe {
        ChangeWindowMessageFilterEx(hwnd, RelayMessage::WINDOW_MESSAGE, MSGFLT_ALLOW, None)
    } {
        warn!(error = %e, "Failed to allow relay message through UIPI filter");
    }

    Ok(hwnd)
}

unsafe extern "system" fn relay_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if let Some(message) = RelayMessage::from_window_message(msg, wparam.0) {
        RELAY_SENDER.with(|slot| {
            if let Some(sender) = slot.borrow().as_ref() {
                let outcome = sender.try_post(message);
                if !outcome.is_queued() {
                    debug!(outcome = ?outcome, "Relay message not queued");
                }
            }
        });
        return LRESULT(0);
    }

    match msg {
        WM_CLOSE => {
            let _ = unsafe { DestroyWindow(hwnd) };
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
