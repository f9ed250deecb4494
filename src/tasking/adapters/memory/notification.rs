//! Recording notification sink for tests and store-less embedders.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::tasking::ports::{
    AssignmentNotice, NotificationError, NotificationResult, NotificationSink,
};

/// Notification sink that records notices in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSink {
    notices: Arc<RwLock<Vec<AssignmentNotice>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent delivery fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a snapshot of the delivered notices.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the backing store is poisoned.
    pub fn notices(&self) -> NotificationResult<Vec<AssignmentNotice>> {
        let notices = self
            .notices
            .read()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(notices.clone())
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn notify_assignment(&self, notice: AssignmentNotice) -> NotificationResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::delivery(std::io::Error::other(
                "notification channel unavailable",
            )));
        }
        let mut notices = self
            .notices
            .write()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        notices.push(notice);
        Ok(())
    }
}
