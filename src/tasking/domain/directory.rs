//! Read models for the project and user directory.
//!
//! The directory is an external collaborator; these records carry exactly
//! the facts the core needs for authorization and reporting.

use super::{ProjectId, Role, SectionId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory record for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Users granted access to the project.
    pub accessible_by: Vec<UserId>,
    /// Users managing the project; the pool task leads are drawn from.
    pub managed_by: Vec<UserId>,
    /// Whether the project is currently active.
    pub is_active: bool,
    /// Whether the project has been archived.
    pub is_archived: bool,
    /// Whether the project has been soft-deleted.
    pub is_deleted: bool,
}

impl Project {
    /// Returns whether the user may access or manage the project.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.accessible_by.contains(&user) || self.managed_by.contains(&user)
    }

    /// Returns whether the user manages the project.
    #[must_use]
    pub fn is_managed_by(&self, user: UserId) -> bool {
        self.managed_by.contains(&user)
    }

    /// Validates that the project can receive new tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectUnavailable`] naming the first blocking state.
    pub fn ensure_accepts_tasks(&self) -> Result<(), ProjectUnavailable> {
        if self.is_archived {
            return Err(ProjectUnavailable::Archived(self.id));
        }
        if self.is_deleted {
            return Err(ProjectUnavailable::Deleted(self.id));
        }
        if !self.is_active {
            return Err(ProjectUnavailable::Inactive(self.id));
        }
        Ok(())
    }
}

/// Reason a project cannot receive new tasks.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ProjectUnavailable {
    /// The project has been archived.
    #[error("project {0} is archived")]
    Archived(ProjectId),
    /// The project has been deleted.
    #[error("project {0} is deleted")]
    Deleted(ProjectId),
    /// The project is inactive.
    #[error("project {0} is inactive")]
    Inactive(ProjectId),
}

/// Directory record for a project section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier.
    pub id: SectionId,
    /// Owning project.
    pub project: ProjectId,
    /// Display name.
    pub name: String,
    /// Whether the section has been archived.
    pub is_archived: bool,
}

/// Directory record for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Assigned role.
    pub role: Role,
    /// Whether the account has been soft-deleted.
    pub is_deleted: bool,
}
