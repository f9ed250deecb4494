//! Port contracts for the tasking module's external collaborators.

mod audit;
mod comment;
mod directory;
mod notification;
mod rating;
mod repository;

pub use audit::{AuditSink, AuditSinkError, AuditSinkResult};
pub use comment::{CommentStore, CommentStoreError, CommentStoreResult};
pub use directory::{DirectoryError, DirectoryResult, OrgDirectory};
pub use notification::{
    AssignmentNotice, NotificationError, NotificationResult, NotificationSink,
};
pub use rating::{RatingStore, RatingStoreError, RatingStoreResult};
pub use repository::{
    ReturnDocument, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    TaskSort,
};
