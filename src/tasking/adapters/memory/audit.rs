//! Recording audit sink for tests and store-less embedders.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::tasking::domain::AuditEntry;
use crate::tasking::ports::{AuditSink, AuditSinkError, AuditSinkResult};

/// Audit sink that records entries in memory.
///
/// Flip [`RecordingAuditSink::set_failing`] to exercise the
/// partial-success path of the lifecycle service.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSink {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent append fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a snapshot of the recorded entries.
    ///
    /// # Errors
    ///
    /// Returns [`AuditSinkError`] when the backing store is poisoned.
    pub fn entries(&self) -> AuditSinkResult<Vec<AuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| AuditSinkError::append(std::io::Error::other(err.to_string())))?;
        Ok(entries.clone())
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn append(&self, entry: AuditEntry) -> AuditSinkResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuditSinkError::append(std::io::Error::other(
                "audit sink unavailable",
            )));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|err| AuditSinkError::append(std::io::Error::other(err.to_string())))?;
        entries.push(entry);
        Ok(())
    }
}
