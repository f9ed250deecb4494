//! Immutable runtime policy for the tasking core.
//!
//! Everything the original deployment read from ambient environment
//! variables is loaded once into this struct and passed by reference into
//! the authorization engine and the query builder.

use crate::tasking::domain::{Role, RolePriorityTable, TaskGroupKey, TaskSortKey, TaskStatus};

/// Policy knobs governing task lifecycle and reporting behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPolicyConfig {
    /// Seniority ranking over roles.
    pub roles: RolePriorityTable,
    /// Status values in configured order; the first is the creation
    /// default.
    pub status_order: Vec<TaskStatus>,
    /// Group-by keys accepted by the listing service.
    pub allowed_group_keys: Vec<TaskGroupKey>,
    /// Sort keys accepted by the listing service.
    pub allowed_sort_keys: Vec<TaskSortKey>,
    /// Hours past the due date after which a rating counts as delayed.
    pub rating_grace_hours: i64,
}

impl TaskPolicyConfig {
    /// Returns the status assigned to newly created tasks.
    #[must_use]
    pub fn default_status(&self) -> TaskStatus {
        self.status_order
            .first()
            .copied()
            .unwrap_or(TaskStatus::NotStarted)
    }

    /// Returns whether the listing service accepts the group key.
    #[must_use]
    pub fn allows_group_key(&self, key: TaskGroupKey) -> bool {
        self.allowed_group_keys.contains(&key)
    }

    /// Returns whether the listing service accepts the sort key.
    #[must_use]
    pub fn allows_sort_key(&self, key: TaskSortKey) -> bool {
        self.allowed_sort_keys.contains(&key)
    }
}

impl Default for TaskPolicyConfig {
    fn default() -> Self {
        Self {
            roles: RolePriorityTable::from_seniority_order(&Role::ALL_ASCENDING),
            status_order: vec![
                TaskStatus::NotStarted,
                TaskStatus::Ongoing,
                TaskStatus::OnHold,
                TaskStatus::Completed,
            ],
            allowed_group_keys: vec![
                TaskGroupKey::Default,
                TaskGroupKey::Project,
                TaskGroupKey::CreatedBy,
                TaskGroupKey::AssignedTo,
                TaskGroupKey::Status,
                TaskGroupKey::Section,
            ],
            allowed_sort_keys: vec![TaskSortKey::DueDate, TaskSortKey::CreatedAt],
            // Operational parameter; deployments tune it.
            rating_grace_hours: 48,
        }
    }
}
