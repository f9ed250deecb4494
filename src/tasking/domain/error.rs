//! Error types for tasking domain validation.

use super::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or mutating tasking domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// No lead was supplied for a new task.
    #[error("a task requires at least one lead")]
    MissingLead,

    /// The due date falls before the current calendar day.
    #[error("task due date {due} is earlier than the current day {today}")]
    DueDateBeforeToday {
        /// Requested due date.
        due: NaiveDate,
        /// Current calendar day.
        today: NaiveDate,
    },

    /// The rating value is outside the accepted 1-6 range.
    #[error("rating {0} is outside the accepted range 1-6")]
    InvalidRatingScore(u8),

    /// Completion was requested on a task that has no due date.
    #[error("task {0} cannot be completed without a due date")]
    CompletionRequiresDueDate(TaskId),

    /// The completed status is terminal for the status-update path.
    #[error("task {0} is completed and its status can no longer change")]
    CompletedStatusIsTerminal(TaskId),

    /// A rated task can never change status.
    #[error("task {0} has been rated and its status is locked")]
    StatusLockedByRating(TaskId),

    /// The task already carries a rating.
    #[error("task {0} has already been rated")]
    AlreadyRated(TaskId),

    /// Rating requires the task to be completed first.
    #[error("task {0} is not completed and cannot be rated")]
    RatingRequiresCompletion(TaskId),

    /// Rating requires the task to carry a due date.
    #[error("task {0} has no due date and cannot be rated")]
    RatingRequiresDueDate(TaskId),

    /// Rating requires the task to be assigned to someone.
    #[error("task {0} is not assigned to anyone and cannot be rated")]
    RatingRequiresAssignee(TaskId),
}
