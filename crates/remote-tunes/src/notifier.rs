//! Desktop notifications for user-visible reports.

use remote_tunes_core::UserNotifier;

use notify_rust::Notification;
use tracing::{info, warn};

/// Shows reports as desktop toasts, and always logs them.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    show_toasts: bool,
}

impl DesktopNotifier {
    /// Create a notifier. With `show_toasts` off, reports are only logged.
    pub fn new(show_toasts: bool) -> Self {
        Self { show_toasts }
    }
}

impl UserNotifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) {
        info!(summary, body, "User notification");

        if !self.show_toasts {
            return;
        }

        if let Err(e) = Notification::new()
            .appname("RemoteTunes")
            .summary(summary)
            .body(body)
            .show()
        {
            warn!(error = %e, "Desktop notification failed");
        }
    }
}
