//! Rating aggregation service.

use super::{DependencyError, keyed_lock::KeyedLock};
use crate::tasking::domain::{RatingAggregate, RatingAggregateKey, UserId};
use crate::tasking::ports::{RatingStore, TaskFilter, TaskRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Recomputes per-due-date rating aggregates from their sibling tasks.
///
/// The aggregate for a cohort (one assignee, one due date) is always the
/// mean over all currently-rated siblings, re-read from the repository on
/// every update. Recomputes for the same cohort serialize on a per-key
/// lock; a last-writer-wins upsert under concurrency would otherwise drop
/// ratings.
pub struct RatingAggregator {
    repository: Arc<dyn TaskRepository>,
    store: Arc<dyn RatingStore>,
    cohort_locks: KeyedLock<(UserId, DateTime<Utc>)>,
}

impl RatingAggregator {
    /// Creates an aggregator over the given repository and store.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>, store: Arc<dyn RatingStore>) -> Self {
        Self {
            repository,
            store,
            cohort_locks: KeyedLock::new(),
        }
    }

    /// Recomputes and persists the aggregate for a cohort.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError`] when the repository or store fail, or
    /// when the cohort unexpectedly holds no rated tasks.
    pub async fn recompute(
        &self,
        user: UserId,
        due_date: DateTime<Utc>,
    ) -> Result<RatingAggregate, DependencyError> {
        let _guard = self.cohort_locks.acquire((user, due_date)).await;

        let filter = TaskFilter {
            assigned_to: Some(vec![user]),
            due_exact: Some(due_date),
            ..TaskFilter::default()
        };
        let siblings = self.repository.find(&filter, None).await?;

        let key = RatingAggregateKey::new(user, due_date);
        let aggregate = RatingAggregate::from_rated_siblings(key, &siblings)
            .ok_or(DependencyError::AggregateInconsistent { user, due_date })?;

        Ok(self.store.upsert(&aggregate).await?)
    }
}
