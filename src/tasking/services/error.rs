//! Service-level error taxonomy.
//!
//! Every operation surfaces one of five classifiable outcomes: validation,
//! not-found, forbidden, conflict, or dependency failure. Errors propagate
//! typed and unmodified; nothing is swallowed except best-effort
//! notification delivery.

use crate::tasking::access::AccessDenial;
use crate::tasking::domain::{
    ProjectId, ProjectUnavailable, SectionId, TaskDomainError, TaskGroupKey, TaskId, TaskSortKey,
    UserId,
};
use crate::tasking::ports::{
    CommentStoreError, DirectoryError, RatingStoreError, TaskRepositoryError,
};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type for tasking service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Input-shape violations detected before any mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A domain-level field validation failed.
    #[error(transparent)]
    Domain(TaskDomainError),

    /// A comment was supplied without text.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// The requested group-by key is outside the configured allow-list.
    #[error("group key '{0}' is not supported")]
    UnsupportedGroupKey(TaskGroupKey),

    /// The requested sort key is outside the configured allow-list.
    #[error("sort key '{0}' is not supported")]
    UnsupportedSortKey(TaskSortKey),
}

/// Operations incompatible with the current entity state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConflictError {
    /// A domain-level state rule rejected the mutation.
    #[error(transparent)]
    Domain(TaskDomainError),

    /// Completed tasks are closed for edits below super-admin.
    #[error("task {0} is completed and can no longer be edited")]
    CompletedTaskImmutable(TaskId),

    /// Status changes need an assignee to measure seniority against.
    #[error("task {0} is not assigned to anyone; its status cannot change")]
    TaskUnassigned(TaskId),

    /// Completed or rated tasks survive everything but a super-admin.
    #[error("task {0} is completed or rated and cannot be deleted")]
    CompletedOrRatedTaskUndeletable(TaskId),

    /// The target project cannot receive tasks.
    #[error(transparent)]
    Project(#[from] ProjectUnavailable),
}

/// Entity a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    /// A task.
    Task(TaskId),
    /// A project.
    Project(ProjectId),
    /// A section.
    Section(SectionId),
    /// A user account.
    User(UserId),
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {id}"),
            Self::Project(id) => write!(f, "project {id}"),
            Self::Section(id) => write!(f, "section {id}"),
            Self::User(id) => write!(f, "user {id}"),
        }
    }
}

/// Failures of external collaborators.
#[derive(Debug, Clone, Error)]
pub enum DependencyError {
    /// The task repository failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The project/user directory failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The comment store failed.
    #[error(transparent)]
    Comments(#[from] CommentStoreError),

    /// The rating store failed.
    #[error(transparent)]
    Ratings(#[from] RatingStoreError),

    /// An aggregate recompute found no rated tasks in its cohort.
    #[error("rating cohort for user {user} due {due_date} holds no rated tasks")]
    AggregateInconsistent {
        /// The cohort's assignee.
        user: UserId,
        /// The cohort's due date.
        due_date: DateTime<Utc>,
    },
}

/// Umbrella error for every tasking service operation.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// Input failed validation before any mutation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity is absent or soft-deleted.
    #[error("{0} was not found")]
    NotFound(MissingEntity),

    /// The authorization engine denied the operation.
    #[error("forbidden: {0}")]
    Forbidden(#[from] AccessDenial),

    /// The operation is incompatible with current entity state.
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// An external collaborator failed.
    #[error("dependency failure: {0}")]
    Dependency(#[from] DependencyError),
}

impl From<TaskDomainError> for TaskServiceError {
    /// Classifies a domain error into the service taxonomy: field-shape
    /// violations are validation problems, state-machine violations are
    /// conflicts.
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::EmptyTitle
            | TaskDomainError::MissingLead
            | TaskDomainError::DueDateBeforeToday { .. }
            | TaskDomainError::InvalidRatingScore(_) => {
                Self::Validation(ValidationError::Domain(err))
            }
            TaskDomainError::CompletionRequiresDueDate(_)
            | TaskDomainError::CompletedStatusIsTerminal(_)
            | TaskDomainError::StatusLockedByRating(_)
            | TaskDomainError::AlreadyRated(_)
            | TaskDomainError::RatingRequiresCompletion(_)
            | TaskDomainError::RatingRequiresDueDate(_)
            | TaskDomainError::RatingRequiresAssignee(_) => {
                Self::Conflict(ConflictError::Domain(err))
            }
        }
    }
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        Self::Dependency(DependencyError::Repository(err))
    }
}

impl From<DirectoryError> for TaskServiceError {
    fn from(err: DirectoryError) -> Self {
        Self::Dependency(DependencyError::Directory(err))
    }
}

impl From<CommentStoreError> for TaskServiceError {
    fn from(err: CommentStoreError) -> Self {
        Self::Dependency(DependencyError::Comments(err))
    }
}

impl From<RatingStoreError> for TaskServiceError {
    fn from(err: RatingStoreError) -> Self {
        Self::Dependency(DependencyError::Ratings(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_shape_errors_classify_as_validation() {
        let err = TaskServiceError::from(TaskDomainError::InvalidRatingScore(7));
        assert!(matches!(err, TaskServiceError::Validation(_)));
    }

    #[test]
    fn state_machine_errors_classify_as_conflict() {
        let err = TaskServiceError::from(TaskDomainError::AlreadyRated(TaskId::new()));
        assert!(matches!(err, TaskServiceError::Conflict(_)));
    }
}
