//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tasking::domain::{Task, TaskId, TaskPatch};
use crate::tasking::ports::{
    ReturnDocument, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    TaskSort,
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        returning: ReturnDocument,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let previous = stored.clone();
        stored.apply_patch(patch);
        match returning {
            ReturnDocument::Previous => Ok(previous),
            ReturnDocument::Updated => Ok(stored.clone()),
        }
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .get(&id)
            .filter(|task| !task.is_deleted())
            .cloned())
    }

    async fn find(
        &self,
        filter: &TaskFilter,
        sort: Option<TaskSort>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        match sort {
            Some(instruction) => tasks.sort_by(|a, b| instruction.compare(a, b)),
            // Deterministic order even without an instruction.
            None => tasks.sort_by(|a, b| {
                a.created_at()
                    .cmp(&b.created_at())
                    .then_with(|| a.id().cmp(&b.id()))
            }),
        }
        Ok(tasks)
    }
}
