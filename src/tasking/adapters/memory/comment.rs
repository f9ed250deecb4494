//! In-memory comment store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tasking::domain::{Comment, CommentId};
use crate::tasking::ports::{CommentStore, CommentStoreError, CommentStoreResult};

/// Thread-safe in-memory comment store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentStore {
    state: Arc<RwLock<HashMap<CommentId, Comment>>>,
}

impl InMemoryCommentStore {
    /// Creates an empty comment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stored comment, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CommentStoreError`] when the backing store is poisoned.
    pub fn get(&self, id: CommentId) -> CommentStoreResult<Option<Comment>> {
        let state = self.state.read().map_err(|err| {
            CommentStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert(&self, comment: &Comment) -> CommentStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&comment.id()) {
            return Err(CommentStoreError::DuplicateComment(comment.id()));
        }
        state.insert(comment.id(), comment.clone());
        Ok(())
    }
}
