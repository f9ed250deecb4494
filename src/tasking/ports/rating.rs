//! Rating store port for per-due-date aggregates.

use crate::tasking::domain::{RatingAggregate, RatingAggregateKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for rating store operations.
pub type RatingStoreResult<T> = Result<T, RatingStoreError>;

/// Persistence contract for rating aggregates.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Inserts or replaces the aggregate for its cohort key, preserving
    /// the identity of a previously stored aggregate. Returns the stored
    /// record.
    async fn upsert(&self, aggregate: &RatingAggregate) -> RatingStoreResult<RatingAggregate>;

    /// Finds the aggregate for a cohort key.
    async fn find_by_key(
        &self,
        key: &RatingAggregateKey,
    ) -> RatingStoreResult<Option<RatingAggregate>>;
}

/// Errors returned by rating store implementations.
#[derive(Debug, Clone, Error)]
pub enum RatingStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RatingStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
