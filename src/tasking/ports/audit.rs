//! Audit sink port.

use crate::tasking::domain::AuditEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit sink operations.
pub type AuditSinkResult<T> = Result<T, AuditSinkError>;

/// Append-only contract for the audit trail.
///
/// Appends happen after the mutation they describe; a failed append is
/// reported to the caller as a partial success, never rolled back.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends an entry to the audit trail.
    async fn append(&self, entry: AuditEntry) -> AuditSinkResult<()>;
}

/// Errors returned by audit sink implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditSinkError {
    /// The sink rejected or failed the append.
    #[error("audit append failed: {0}")]
    Append(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditSinkError {
    /// Wraps an append failure.
    pub fn append(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Append(Arc::new(err))
    }
}
