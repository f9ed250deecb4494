//! In-memory rating aggregate store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tasking::domain::{RatingAggregate, RatingAggregateKey, UserId};
use crate::tasking::ports::{RatingStore, RatingStoreError, RatingStoreResult};

type CohortKey = (UserId, DateTime<Utc>);

/// Thread-safe in-memory rating aggregate store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRatingStore {
    state: Arc<RwLock<HashMap<CohortKey, RatingAggregate>>>,
}

impl InMemoryRatingStore {
    /// Creates an empty rating store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn upsert(&self, aggregate: &RatingAggregate) -> RatingStoreResult<RatingAggregate> {
        let mut state = self.state.write().map_err(|err| {
            RatingStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let cohort = (aggregate.user(), aggregate.due_date());
        // An existing aggregate keeps its identity across recomputes.
        let stored = match state.get(&cohort) {
            Some(existing) => aggregate.clone().with_id(existing.id()),
            None => aggregate.clone(),
        };
        state.insert(cohort, stored.clone());
        Ok(stored)
    }

    async fn find_by_key(
        &self,
        key: &RatingAggregateKey,
    ) -> RatingStoreResult<Option<RatingAggregate>> {
        let state = self.state.read().map_err(|err| {
            RatingStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&(key.user, key.due_date)).cloned())
    }
}
