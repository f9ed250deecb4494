//! Rating score and the per-due-date rating aggregate.

use super::{RatingAggregateId, Task, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Validated task rating in the inclusive 1-6 range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RatingScore(u8);

impl RatingScore {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 6;

    /// Creates a validated rating score.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRatingScore`] when the value is
    /// outside the 1-6 range.
    pub const fn new(value: u8) -> Result<Self, TaskDomainError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(TaskDomainError::InvalidRatingScore(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cohort key for rating aggregation: one user, one due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingAggregateKey {
    /// The rated user (the task assignee).
    pub user: UserId,
    /// The shared due date of the cohort.
    pub due_date: DateTime<Utc>,
}

impl RatingAggregateKey {
    /// Creates a cohort key.
    #[must_use]
    pub const fn new(user: UserId, due_date: DateTime<Utc>) -> Self {
        Self { user, due_date }
    }

    /// Calendar year of the due date (UTC).
    #[must_use]
    pub fn year(&self) -> i32 {
        self.due_date.year()
    }

    /// Calendar month of the due date (UTC), 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.due_date.month()
    }

    /// Calendar day of the due date (UTC), 1-31.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.due_date.day()
    }
}

/// Mean rating across all rated tasks sharing one assignee and due date.
///
/// Always recomputed from the full cohort, never incrementally updated, so
/// recomputing twice with the same inputs yields the same aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    id: RatingAggregateId,
    user: UserId,
    due_date: DateTime<Utc>,
    year: i32,
    month: u32,
    day: u32,
    rating: f64,
    task_ids: BTreeSet<TaskId>,
}

impl RatingAggregate {
    /// Builds the aggregate for a cohort from its sibling tasks.
    ///
    /// Unrated siblings are ignored; returns `None` when no sibling
    /// carries a rating.
    #[must_use]
    pub fn from_rated_siblings(key: RatingAggregateKey, siblings: &[Task]) -> Option<Self> {
        let rated: Vec<&Task> = siblings.iter().filter(|task| task.is_rated()).collect();
        if rated.is_empty() {
            return None;
        }

        let sum: f64 = rated
            .iter()
            .filter_map(|task| task.rating())
            .map(|score| f64::from(score.value()))
            .sum();
        let rating = sum / rated.len() as f64;
        let task_ids = rated.iter().map(|task| task.id()).collect();

        Some(Self {
            id: RatingAggregateId::new(),
            user: key.user,
            due_date: key.due_date,
            year: key.year(),
            month: key.month(),
            day: key.day(),
            rating,
            task_ids,
        })
    }

    /// Returns the aggregate identifier.
    #[must_use]
    pub const fn id(&self) -> RatingAggregateId {
        self.id
    }

    /// Replaces the identifier, preserving the identity of a stored
    /// aggregate across recomputations.
    #[must_use]
    pub fn with_id(mut self, id: RatingAggregateId) -> Self {
        self.id = id;
        self
    }

    /// Returns the rated user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the cohort due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the cohort key.
    #[must_use]
    pub const fn key(&self) -> RatingAggregateKey {
        RatingAggregateKey::new(self.user, self.due_date)
    }

    /// Calendar year of the due date.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month of the due date.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Calendar day of the due date.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Returns the mean rating across the rated cohort.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the contributing task identifiers.
    #[must_use]
    pub const fn task_ids(&self) -> &BTreeSet<TaskId> {
        &self.task_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasking::domain::{
        NewTask, ProjectId, SectionId, TaskPriority, TaskStatus,
    };
    use chrono::Duration;
    use mockable::DefaultClock;

    fn rated_task(assignee: UserId, due: DateTime<Utc>, score: u8) -> Task {
        let clock = DefaultClock;
        let mut task = Task::create(
            NewTask {
                title: "cohort member".to_owned(),
                description: None,
                status: TaskStatus::NotStarted,
                section: SectionId::new(),
                project: ProjectId::new(),
                created_by: UserId::new(),
                assigned_to: Some(assignee),
                lead: vec![UserId::new()],
                due_date: Some(due),
                priority: TaskPriority::Medium,
                attachments: Vec::new(),
            },
            &clock,
        )
        .expect("task should be created");
        task.transition_status(TaskStatus::Completed, &clock)
            .expect("completion should succeed");
        task.apply_rating(
            RatingScore::new(score).expect("score should be valid"),
            UserId::new(),
            false,
            &clock,
        )
        .expect("rating should succeed");
        task
    }

    #[test]
    fn score_range_is_enforced() {
        assert!(RatingScore::new(0).is_err());
        assert!(RatingScore::new(7).is_err());
        assert!(RatingScore::new(1).is_ok());
        assert!(RatingScore::new(6).is_ok());
    }

    #[test]
    fn aggregate_is_mean_of_rated_siblings() {
        let assignee = UserId::new();
        let due = Utc::now() + Duration::days(1);
        let siblings = vec![
            rated_task(assignee, due, 4),
            rated_task(assignee, due, 6),
        ];

        let aggregate =
            RatingAggregate::from_rated_siblings(RatingAggregateKey::new(assignee, due), &siblings)
                .expect("aggregate should exist");

        assert!((aggregate.rating() - 5.0).abs() < f64::EPSILON);
        assert_eq!(aggregate.task_ids().len(), 2);
    }

    #[test]
    fn recompute_is_idempotent() {
        let assignee = UserId::new();
        let due = Utc::now() + Duration::days(1);
        let siblings = vec![
            rated_task(assignee, due, 2),
            rated_task(assignee, due, 3),
            rated_task(assignee, due, 4),
        ];
        let key = RatingAggregateKey::new(assignee, due);

        let first = RatingAggregate::from_rated_siblings(key, &siblings)
            .expect("aggregate should exist");
        let second = RatingAggregate::from_rated_siblings(key, &siblings)
            .expect("aggregate should exist");

        assert!((first.rating() - second.rating()).abs() < f64::EPSILON);
        assert_eq!(first.task_ids(), second.task_ids());
    }

    #[test]
    fn cohort_without_ratings_produces_no_aggregate() {
        let key = RatingAggregateKey::new(UserId::new(), Utc::now());
        assert!(RatingAggregate::from_rated_siblings(key, &[]).is_none());
    }

    #[test]
    fn key_calendar_parts_follow_due_date() {
        let due = DateTime::parse_from_rfc3339("2026-03-09T18:30:00Z")
            .expect("timestamp should parse")
            .with_timezone(&Utc);
        let key = RatingAggregateKey::new(UserId::new(), due);
        assert_eq!(key.year(), 2026);
        assert_eq!(key.month(), 3);
        assert_eq!(key.day(), 9);
    }
}
