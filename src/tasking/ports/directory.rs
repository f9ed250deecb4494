//! Directory port for project, section, and user lookups.

use crate::tasking::domain::{Project, ProjectId, Section, SectionId, UserAccount, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only contract for the project/user directory.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> DirectoryResult<Option<Project>>;

    /// Finds a section by identifier.
    async fn find_section(&self, id: SectionId) -> DirectoryResult<Option<Section>>;

    /// Finds a user account by identifier.
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<UserAccount>>;

    /// Lists the identifiers of soft-deleted user accounts.
    async fn list_deleted_users(&self) -> DirectoryResult<Vec<UserId>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Lookup-layer failure.
    #[error("directory lookup error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a lookup-layer failure.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
