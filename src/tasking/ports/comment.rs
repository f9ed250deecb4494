//! Comment store port.

use crate::tasking::domain::{Comment, CommentId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for comment store operations.
pub type CommentStoreResult<T> = Result<T, CommentStoreError>;

/// Persistence contract for comments.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`CommentStoreError::DuplicateComment`] when the identifier
    /// already exists.
    async fn insert(&self, comment: &Comment) -> CommentStoreResult<()>;
}

/// Errors returned by comment store implementations.
#[derive(Debug, Clone, Error)]
pub enum CommentStoreError {
    /// A comment with the same identifier already exists.
    #[error("duplicate comment identifier: {0}")]
    DuplicateComment(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CommentStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
