//! Port for user-visible notices.

use crate::domain::Notice;

/// Receives the confirmations and error messages raised by mutations.
///
/// Presentation layers render these as toasts; headless hosts can log them.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notice to the user.
    fn notify(&self, notice: &Notice);
}

/// Sink that drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notice: &Notice) {}
}
