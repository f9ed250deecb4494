//! Audit-trail records for task mutations.

use super::{CommentId, RatingAggregateId, TaskField, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Action recorded against a task in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A task was created.
    TaskAdded,
    /// Task attributes changed.
    TaskUpdated,
    /// The task status changed.
    TaskStatusUpdated,
    /// The task due date changed.
    TaskDueDateUpdated,
    /// The task was soft-deleted.
    TaskDeleted,
    /// A comment was added to the task.
    TaskComment,
    /// The task was rated.
    RateTask,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAdded => "TASK_ADDED",
            Self::TaskUpdated => "TASK_UPDATED",
            Self::TaskStatusUpdated => "TASK_STATUS_UPDATED",
            Self::TaskDueDateUpdated => "TASK_DUEDATE_UPDATED",
            Self::TaskDeleted => "TASK_DELETED",
            Self::TaskComment => "TASK_COMMENT",
            Self::RateTask => "RATE_TASK",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AuditAction {
    type Error = ParseAuditActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TASK_ADDED" => Ok(Self::TaskAdded),
            "TASK_UPDATED" => Ok(Self::TaskUpdated),
            "TASK_STATUS_UPDATED" => Ok(Self::TaskStatusUpdated),
            "TASK_DUEDATE_UPDATED" => Ok(Self::TaskDueDateUpdated),
            "TASK_DELETED" => Ok(Self::TaskDeleted),
            "TASK_COMMENT" => Ok(Self::TaskComment),
            "RATE_TASK" => Ok(Self::RateTask),
            _ => Err(ParseAuditActionError(value.to_owned())),
        }
    }
}

/// Error returned while parsing an audit action from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown audit action: {0}")]
pub struct ParseAuditActionError(pub String);

/// One entry in the task audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The recorded action.
    pub action: AuditAction,
    /// The acting user.
    pub actor: UserId,
    /// The affected task.
    pub task: TaskId,
    /// Comment involved in the action, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentId>,
    /// Rating aggregate touched by the action, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingAggregateId>,
    /// User the action concerns beyond the actor (e.g. the rated
    /// assignee), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_user: Option<UserId>,
    /// Before-values of changed attributes.
    pub previous: BTreeMap<TaskField, Value>,
    /// After-values of changed attributes.
    pub new: BTreeMap<TaskField, Value>,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an audit entry with empty change maps.
    #[must_use]
    pub fn new(action: AuditAction, actor: UserId, task: TaskId, clock: &impl Clock) -> Self {
        Self {
            action,
            actor,
            task,
            comment: None,
            rating: None,
            subject_user: None,
            previous: BTreeMap::new(),
            new: BTreeMap::new(),
            recorded_at: clock.utc(),
        }
    }

    /// Attaches the comment the action created.
    #[must_use]
    pub fn with_comment(mut self, comment: CommentId) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Attaches the rating aggregate the action touched.
    #[must_use]
    pub fn with_rating(mut self, rating: RatingAggregateId) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attaches the user the action concerns.
    #[must_use]
    pub fn with_subject_user(mut self, user: UserId) -> Self {
        self.subject_user = Some(user);
        self
    }

    /// Attaches before/after values for changed attributes.
    #[must_use]
    pub fn with_changes(
        mut self,
        previous: BTreeMap<TaskField, Value>,
        new: BTreeMap<TaskField, Value>,
    ) -> Self {
        self.previous = previous;
        self.new = new;
        self
    }
}
