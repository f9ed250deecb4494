//! Repository port for task persistence and querying.

use crate::tasking::domain::{
    ProjectId, SectionId, SortDirection, Task, TaskId, TaskPatch, TaskPriority, TaskSortKey,
    TaskStatus, UserId,
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Which snapshot an update returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDocument {
    /// Return the document as it was before the patch.
    Previous,
    /// Return the document after the patch.
    Updated,
}

/// Composable filter over task attributes.
///
/// Mirrors the narrow query surface the core needs from a document store:
/// membership tests, set inclusion/exclusion, and due-date windows.
/// Soft-deleted tasks are excluded unless `include_deleted` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Match only these task identifiers.
    pub ids: Option<Vec<TaskId>>,
    /// Match tasks in any of these projects.
    pub projects: Option<Vec<ProjectId>>,
    /// Match tasks in any of these sections.
    pub sections: Option<Vec<SectionId>>,
    /// Match tasks in any of these statuses.
    pub statuses: Option<Vec<TaskStatus>>,
    /// Exclude tasks in any of these statuses.
    pub exclude_statuses: Option<Vec<TaskStatus>>,
    /// Match tasks with any of these priorities.
    pub priorities: Option<Vec<TaskPriority>>,
    /// Match tasks assigned to any of these users.
    pub assigned_to: Option<Vec<UserId>>,
    /// Exclude tasks assigned to any of these users.
    pub assigned_not_in: Option<Vec<UserId>>,
    /// Match tasks created by any of these users.
    pub created_by: Option<Vec<UserId>>,
    /// Exclude tasks created by any of these users.
    pub created_not_in: Option<Vec<UserId>>,
    /// Match tasks led by any of these users.
    pub lead_any: Option<Vec<UserId>>,
    /// Match tasks the user created or is assigned to.
    pub created_or_assigned: Option<UserId>,
    /// Match tasks with a due date at or after this instant.
    pub due_after: Option<chrono::DateTime<chrono::Utc>>,
    /// Match tasks with a due date at or before this instant.
    pub due_before: Option<chrono::DateTime<chrono::Utc>>,
    /// Match tasks with exactly this due date.
    pub due_exact: Option<chrono::DateTime<chrono::Utc>>,
    /// Match on the rated flag.
    pub is_rated: Option<bool>,
    /// Match on the delay-rated flag.
    pub is_delay_rated: Option<bool>,
    /// Include soft-deleted tasks.
    pub include_deleted: bool,
}

impl TaskFilter {
    /// Returns whether the task satisfies every present predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if task.is_deleted() && !self.include_deleted {
            return false;
        }
        if let Some(ids) = &self.ids
            && !ids.contains(&task.id())
        {
            return false;
        }
        if let Some(projects) = &self.projects
            && !projects.contains(&task.project())
        {
            return false;
        }
        if let Some(sections) = &self.sections
            && !sections.contains(&task.section())
        {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&task.status())
        {
            return false;
        }
        if let Some(excluded) = &self.exclude_statuses
            && excluded.contains(&task.status())
        {
            return false;
        }
        if let Some(priorities) = &self.priorities
            && !priorities.contains(&task.priority())
        {
            return false;
        }
        if let Some(assignees) = &self.assigned_to
            && !task
                .assigned_to()
                .is_some_and(|assignee| assignees.contains(&assignee))
        {
            return false;
        }
        if let Some(excluded) = &self.assigned_not_in
            && task
                .assigned_to()
                .is_some_and(|assignee| excluded.contains(&assignee))
        {
            return false;
        }
        if let Some(creators) = &self.created_by
            && !creators.contains(&task.created_by())
        {
            return false;
        }
        if let Some(excluded) = &self.created_not_in
            && excluded.contains(&task.created_by())
        {
            return false;
        }
        if let Some(leads) = &self.lead_any
            && !leads.iter().any(|lead| task.has_lead(*lead))
        {
            return false;
        }
        if let Some(user) = self.created_or_assigned
            && task.created_by() != user
            && task.assigned_to() != Some(user)
        {
            return false;
        }
        if let Some(after) = self.due_after
            && !task.due_date().is_some_and(|due| due >= after)
        {
            return false;
        }
        if let Some(before) = self.due_before
            && !task.due_date().is_some_and(|due| due <= before)
        {
            return false;
        }
        if let Some(exact) = self.due_exact
            && task.due_date() != Some(exact)
        {
            return false;
        }
        if let Some(rated) = self.is_rated
            && task.is_rated() != rated
        {
            return false;
        }
        if let Some(delay_rated) = self.is_delay_rated
            && task.is_delay_rated() != delay_rated
        {
            return false;
        }
        true
    }
}

/// Sort instruction for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSort {
    /// Attribute to sort by.
    pub key: TaskSortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Creates a sort instruction.
    #[must_use]
    pub const fn new(key: TaskSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Compares two tasks under this instruction.
    ///
    /// Tasks without a due date sort after dated ones regardless of
    /// direction; ties break on task id for determinism.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let primary = match self.key {
            TaskSortKey::DueDate => match (left.due_date(), right.due_date()) {
                (Some(a), Some(b)) => self.direct(a.cmp(&b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            TaskSortKey::CreatedAt => self.direct(left.created_at().cmp(&right.created_at())),
        };
        primary.then_with(|| left.id().cmp(&right.id()))
    }

    const fn direct(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Persistence contract for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Applies a partial update and returns the requested snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        returning: ReturnDocument,
    ) -> TaskRepositoryResult<Task>;

    /// Finds a non-deleted task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks matching the filter, sorted when requested.
    async fn find(
        &self,
        filter: &TaskFilter,
        sort: Option<TaskSort>,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
