//! Vocabulary and pure arithmetic for grouped task reporting.

use super::{ProjectId, SectionId, Task, TaskStatus, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute a task listing is grouped by.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TaskGroupKey {
    /// Group by project and section, the board view.
    #[default]
    Default,
    /// Group by owning project.
    Project,
    /// Group by creating user.
    CreatedBy,
    /// Group by assignee.
    AssignedTo,
    /// Group by lifecycle status.
    Status,
    /// Group by owning section.
    Section,
}

impl TaskGroupKey {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Project => "projectId",
            Self::CreatedBy => "createdBy",
            Self::AssignedTo => "assignedTo",
            Self::Status => "status",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for TaskGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one group in a grouped listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TaskGroupId {
    /// Board bucket: one project section.
    Bucket {
        /// Owning project.
        project: ProjectId,
        /// Owning section.
        section: SectionId,
    },
    /// All tasks of one project.
    Project(ProjectId),
    /// All tasks created by one user.
    Creator(UserId),
    /// All tasks assigned to one user; `None` collects unassigned tasks.
    Assignee(Option<UserId>),
    /// All tasks in one status.
    Status(TaskStatus),
    /// All tasks of one section.
    Section(SectionId),
}

impl TaskGroupId {
    /// Derives the group identity of a task under the given key.
    #[must_use]
    pub fn for_task(key: TaskGroupKey, task: &Task) -> Self {
        match key {
            TaskGroupKey::Default => Self::Bucket {
                project: task.project(),
                section: task.section(),
            },
            TaskGroupKey::Project => Self::Project(task.project()),
            TaskGroupKey::CreatedBy => Self::Creator(task.created_by()),
            TaskGroupKey::AssignedTo => Self::Assignee(task.assigned_to()),
            TaskGroupKey::Status => Self::Status(task.status()),
            TaskGroupKey::Section => Self::Section(task.section()),
        }
    }
}

/// Key a task listing is sorted by.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSortKey {
    /// Order by due date; tasks without a due date sort last.
    #[default]
    DueDate,
    /// Order by creation timestamp.
    CreatedAt,
}

impl TaskSortKey {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due-date",
            Self::CreatedAt => "created-at",
        }
    }
}

impl fmt::Display for TaskSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a sort.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Per-status task counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Tasks in `COMPLETED`.
    pub completed: usize,
    /// Tasks in `ONGOING`.
    pub ongoing: usize,
    /// Tasks in `ONHOLD`.
    pub on_hold: usize,
    /// Tasks in `NOT_STARTED`.
    pub not_started: usize,
}

impl StatusCounts {
    /// Tallies the statuses of the given tasks.
    #[must_use]
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status() {
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Ongoing => counts.ongoing += 1,
                TaskStatus::OnHold => counts.on_hold += 1,
                TaskStatus::NotStarted => counts.not_started += 1,
            }
        }
        counts
    }

    /// Total tasks across all statuses.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.completed + self.ongoing + self.on_hold + self.not_started
    }
}

/// Percentage breakdown of one project's task statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatusBreakdown {
    /// Percentage of completed tasks.
    pub completed_pct: f64,
    /// Percentage of ongoing tasks.
    pub ongoing_pct: f64,
    /// Percentage of on-hold tasks.
    pub on_hold_pct: f64,
    /// Percentage of not-started tasks.
    pub not_started_pct: f64,
    /// Percentage of tasks completed after their due date.
    pub overdue_pct: f64,
    /// Total tasks contributing to the breakdown.
    pub total: usize,
}

impl ProjectStatusBreakdown {
    /// Builds the percentage breakdown from raw counts.
    ///
    /// Percentages are rounded to two decimal places. An empty project
    /// yields an all-zero breakdown.
    #[must_use]
    pub fn from_counts(counts: StatusCounts, overdue: usize) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self::default();
        }
        Self {
            completed_pct: percentage(counts.completed, total),
            ongoing_pct: percentage(counts.ongoing, total),
            on_hold_pct: percentage(counts.on_hold, total),
            not_started_pct: percentage(counts.not_started, total),
            overdue_pct: percentage(overdue, total),
            total,
        }
    }
}

/// Share of `part` in `total` as a percentage rounded to 2 decimals.
fn percentage(part: usize, total: usize) -> f64 {
    let raw = part as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}
