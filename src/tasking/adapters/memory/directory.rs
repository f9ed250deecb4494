//! In-memory project/user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tasking::domain::{Project, ProjectId, Section, SectionId, UserAccount, UserId};
use crate::tasking::ports::{DirectoryError, DirectoryResult, OrgDirectory};

/// Thread-safe in-memory directory of projects, sections, and users.
///
/// Tests and store-less embedders seed it through the `upsert_*` helpers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    projects: HashMap<ProjectId, Project>,
    sections: HashMap<SectionId, Section>,
    users: HashMap<UserId, UserAccount>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a project record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backing store is poisoned.
    pub fn upsert_project(&self, project: Project) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        state.projects.insert(project.id, project);
        Ok(())
    }

    /// Inserts or replaces a section record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backing store is poisoned.
    pub fn upsert_section(&self, section: Section) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        state.sections.insert(section.id, section);
        Ok(())
    }

    /// Inserts or replaces a user record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backing store is poisoned.
    pub fn upsert_user(&self, user: UserAccount) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        state.users.insert(user.id, user);
        Ok(())
    }
}

#[async_trait]
impl OrgDirectory for InMemoryDirectory {
    async fn find_project(&self, id: ProjectId) -> DirectoryResult<Option<Project>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find_section(&self, id: SectionId) -> DirectoryResult<Option<Section>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state.sections.get(&id).cloned())
    }

    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<UserAccount>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list_deleted_users(&self) -> DirectoryResult<Vec<UserId>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state
            .users
            .values()
            .filter(|user| user.is_deleted)
            .map(|user| user.id)
            .collect())
    }
}
