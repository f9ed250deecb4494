//! Partial-update and declarative diff machinery for tasks.
//!
//! Update payloads arrive with an arbitrary subset of attributes. A
//! [`FieldPatch`] models presence explicitly: an omitted attribute is
//! `Keep`, never inferred from the emptiness of a value.

use super::{AuditAction, Task, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::{CommentId, ProjectId, RatingScore, SectionId, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};

/// Patch instruction for a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPatch<T> {
    /// Leave the attribute untouched.
    Keep,
    /// Replace the attribute with the given value.
    Set(T),
    /// Remove the attribute (optional attributes only).
    Clear,
}

// Hand-written so `Keep` needs no `T: Default`.
impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> FieldPatch<T> {
    /// Returns whether this patch leaves the attribute untouched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns the replacement value, if one is carried.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep | Self::Clear => None,
        }
    }
}

/// Partial update over the mutable attributes of a task.
///
/// Only attributes carrying `Set`/`Clear` (or a `Some` append) are applied;
/// everything else is preserved by [`Task::apply_patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Title replacement.
    pub title: FieldPatch<String>,
    /// Description replacement or removal.
    pub description: FieldPatch<String>,
    /// Section replacement.
    pub section: FieldPatch<SectionId>,
    /// Project replacement.
    pub project: FieldPatch<ProjectId>,
    /// Status replacement.
    pub status: FieldPatch<TaskStatus>,
    /// Due date replacement or removal.
    pub due_date: FieldPatch<DateTime<Utc>>,
    /// Completion date replacement or removal.
    pub completed_date: FieldPatch<DateTime<Utc>>,
    /// Priority replacement.
    pub priority: FieldPatch<TaskPriority>,
    /// Assignee replacement or removal.
    pub assigned_to: FieldPatch<UserId>,
    /// Lead list replacement.
    pub lead: FieldPatch<Vec<UserId>>,
    /// Attachment list replacement.
    pub attachments: FieldPatch<Vec<String>>,
    /// Soft-delete flag replacement.
    pub is_deleted: FieldPatch<bool>,
    /// Late-completion flag replacement.
    pub is_delay_task: FieldPatch<bool>,
    /// Late-rating flag replacement.
    pub is_delay_rated: FieldPatch<bool>,
    /// Rating replacement.
    pub rating: FieldPatch<RatingScore>,
    /// Rater replacement.
    pub rated_by: FieldPatch<UserId>,
    /// Task comment to append, set-style.
    pub append_comment: Option<CommentId>,
    /// Rating comment to append, set-style.
    pub append_rating_comment: Option<CommentId>,
    /// Update timestamp to record with the patch.
    pub touched_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Returns whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_keep()
            && self.description.is_keep()
            && self.section.is_keep()
            && self.project.is_keep()
            && self.status.is_keep()
            && self.due_date.is_keep()
            && self.completed_date.is_keep()
            && self.priority.is_keep()
            && self.assigned_to.is_keep()
            && self.lead.is_keep()
            && self.attachments.is_keep()
            && self.is_deleted.is_keep()
            && self.is_delay_task.is_keep()
            && self.is_delay_rated.is_keep()
            && self.rating.is_keep()
            && self.rated_by.is_keep()
            && self.append_comment.is_none()
            && self.append_rating_comment.is_none()
    }
}

/// Auditable task attribute.
///
/// The whitelist of attributes the edit diff reports on; everything else
/// changes silently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Owning section.
    Section,
    /// Lifecycle status.
    Status,
    /// Due date.
    DueDate,
    /// Completion date.
    CompletedDate,
    /// Scheduling priority.
    Priority,
    /// Assignee.
    AssignedTo,
}

impl TaskField {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Section => "section",
            Self::Status => "status",
            Self::DueDate => "dueDate",
            Self::CompletedDate => "completedDate",
            Self::Priority => "priority",
            Self::AssignedTo => "assignedTo",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute change between two task snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// The attribute that changed.
    pub field: TaskField,
    /// Value before the change.
    pub previous: Value,
    /// Value after the change.
    pub new: Value,
}

/// Declarative diff over the whitelisted mutable task attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDiff {
    changes: Vec<FieldChange>,
}

impl TaskDiff {
    /// Computes the diff between two snapshots of the same task.
    #[must_use]
    pub fn between(previous: &Task, current: &Task) -> Self {
        let mut changes = Vec::new();
        push_change(
            &mut changes,
            TaskField::Title,
            Value::from(previous.title()),
            Value::from(current.title()),
        );
        push_change(
            &mut changes,
            TaskField::Description,
            optional_text(previous.description()),
            optional_text(current.description()),
        );
        push_change(
            &mut changes,
            TaskField::Section,
            Value::from(previous.section().to_string()),
            Value::from(current.section().to_string()),
        );
        push_change(
            &mut changes,
            TaskField::Status,
            Value::from(previous.status().as_str()),
            Value::from(current.status().as_str()),
        );
        push_change(
            &mut changes,
            TaskField::DueDate,
            optional_timestamp(previous.due_date()),
            optional_timestamp(current.due_date()),
        );
        push_change(
            &mut changes,
            TaskField::CompletedDate,
            optional_timestamp(previous.completed_date()),
            optional_timestamp(current.completed_date()),
        );
        push_change(
            &mut changes,
            TaskField::Priority,
            Value::from(previous.priority().as_str()),
            Value::from(current.priority().as_str()),
        );
        push_change(
            &mut changes,
            TaskField::AssignedTo,
            optional_id(previous.assigned_to()),
            optional_id(current.assigned_to()),
        );
        Self { changes }
    }

    /// Returns the recorded changes.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Returns whether no whitelisted attribute changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns whether the given attribute changed.
    #[must_use]
    pub fn contains(&self, field: TaskField) -> bool {
        self.changes.iter().any(|change| change.field == field)
    }

    /// Classifies the audit action for an edit carrying this diff.
    ///
    /// Status changes outrank due-date changes, which outrank everything
    /// else.
    #[must_use]
    pub fn audit_action(&self) -> AuditAction {
        if self.contains(TaskField::Status) {
            AuditAction::TaskStatusUpdated
        } else if self.contains(TaskField::DueDate) {
            AuditAction::TaskDueDateUpdated
        } else {
            AuditAction::TaskUpdated
        }
    }

    /// Returns the before-values of all changed attributes.
    #[must_use]
    pub fn previous_values(&self) -> BTreeMap<TaskField, Value> {
        self.changes
            .iter()
            .map(|change| (change.field, change.previous.clone()))
            .collect()
    }

    /// Returns the after-values of all changed attributes.
    #[must_use]
    pub fn new_values(&self) -> BTreeMap<TaskField, Value> {
        self.changes
            .iter()
            .map(|change| (change.field, change.new.clone()))
            .collect()
    }
}

fn push_change(changes: &mut Vec<FieldChange>, field: TaskField, previous: Value, new: Value) {
    if previous != new {
        changes.push(FieldChange {
            field,
            previous,
            new,
        });
    }
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn optional_timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |timestamp| {
        Value::from(timestamp.to_rfc3339())
    })
}

fn optional_id(value: Option<UserId>) -> Value {
    value.map_or(Value::Null, |id| Value::from(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasking::domain::NewTask;
    use chrono::Duration;
    use mockable::DefaultClock;

    fn sample_task() -> Task {
        let clock = DefaultClock;
        Task::create(
            NewTask {
                title: "Write onboarding docs".to_owned(),
                description: Some("first draft".to_owned()),
                status: TaskStatus::NotStarted,
                section: SectionId::new(),
                project: ProjectId::new(),
                created_by: UserId::new(),
                assigned_to: Some(UserId::new()),
                lead: vec![UserId::new()],
                due_date: Some(Utc::now() + Duration::days(3)),
                priority: TaskPriority::Medium,
                attachments: Vec::new(),
            },
            &clock,
        )
        .expect("task should be created")
    }

    #[test]
    fn diff_reports_only_changed_fields() {
        let previous = sample_task();
        let mut current = previous.clone();
        current.apply_patch(&TaskPatch {
            title: FieldPatch::Set("Write onboarding guide".to_owned()),
            priority: FieldPatch::Set(TaskPriority::High),
            ..TaskPatch::default()
        });

        let diff = TaskDiff::between(&previous, &current);
        assert_eq!(diff.changes().len(), 2);
        assert!(diff.contains(TaskField::Title));
        assert!(diff.contains(TaskField::Priority));
        assert!(!diff.contains(TaskField::Description));
    }

    #[test]
    fn status_change_outranks_due_date_change() {
        let previous = sample_task();
        let mut current = previous.clone();
        current.apply_patch(&TaskPatch {
            status: FieldPatch::Set(TaskStatus::Ongoing),
            due_date: FieldPatch::Set(Utc::now() + Duration::days(9)),
            ..TaskPatch::default()
        });

        let diff = TaskDiff::between(&previous, &current);
        assert_eq!(diff.audit_action(), AuditAction::TaskStatusUpdated);
    }

    #[test]
    fn due_date_change_alone_classifies_as_due_date_update() {
        let previous = sample_task();
        let mut current = previous.clone();
        current.apply_patch(&TaskPatch {
            due_date: FieldPatch::Set(Utc::now() + Duration::days(9)),
            ..TaskPatch::default()
        });

        let diff = TaskDiff::between(&previous, &current);
        assert_eq!(diff.audit_action(), AuditAction::TaskDueDateUpdated);
    }

    #[test]
    fn unchanged_snapshots_default_to_plain_update() {
        let previous = sample_task();
        let diff = TaskDiff::between(&previous, &previous.clone());
        assert!(diff.is_empty());
        assert_eq!(diff.audit_action(), AuditAction::TaskUpdated);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            append_comment: Some(CommentId::new()),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
