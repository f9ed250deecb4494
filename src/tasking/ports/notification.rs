//! Notification sink port for assignment notices.

use crate::tasking::domain::{ProjectId, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Notice sent when a task is assigned to someone other than its creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentNotice {
    /// The assigned task.
    pub task: TaskId,
    /// Task title for the notice body.
    pub title: String,
    /// Owning project.
    pub project: ProjectId,
    /// Project name for the notice body.
    pub project_name: String,
    /// The assignee being notified.
    pub assignee: UserId,
    /// The user who made the assignment.
    pub assigned_by: UserId,
    /// Opaque deep-link token derived from the task identifier.
    pub link_token: String,
}

/// Fire-and-forget contract for assignment notifications.
///
/// Delivery failure never fails the originating operation.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers an assignment notice.
    async fn notify_assignment(&self, notice: AssignmentNotice) -> NotificationResult<()>;
}

/// Errors returned by notification sink implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// Delivery-layer failure.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a delivery failure.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
