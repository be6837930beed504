//! Notice sinks for headless hosts.

use tracing::{info, warn};

use crate::domain::ports::NotificationSink;
use crate::domain::{Notice, NoticeLevel};

/// Emits every notice as a tracing event.
///
/// Confirmations log at `info`, errors at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => {
                info!(title = %notice.title, description = %notice.description, "notice");
            }
            NoticeLevel::Error => {
                warn!(title = %notice.title, description = %notice.description, "notice");
            }
        }
    }
}
