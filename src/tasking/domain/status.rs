//! Task status state machine and priority scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status of a task.
///
/// Any transition between non-completed statuses is permitted; `COMPLETED`
/// is terminal for the status-update path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TaskStatus {
    /// Work has not begun.
    #[serde(rename = "NOT_STARTED")]
    NotStarted,
    /// Work is in progress.
    #[serde(rename = "ONGOING")]
    Ongoing,
    /// Work is paused.
    #[serde(rename = "ONHOLD")]
    OnHold,
    /// Work is finished; requires a completion date.
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Ongoing => "ONGOING",
            Self::OnHold => "ONHOLD",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns whether this status marks finished work.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns whether a transition away from this status is permitted.
    #[must_use]
    pub const fn can_transition(self) -> bool {
        !self.is_completed()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "ONGOING" => Ok(Self::Ongoing),
            "ONHOLD" => Ok(Self::OnHold),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a task status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Priority assigned to a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Drop everything.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "URGENT" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a task priority from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_is_terminal() {
        assert!(!TaskStatus::Completed.can_transition());
        assert!(TaskStatus::NotStarted.can_transition());
        assert!(TaskStatus::Ongoing.can_transition());
        assert!(TaskStatus::OnHold.can_transition());
    }

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [
            TaskStatus::NotStarted,
            TaskStatus::Ongoing,
            TaskStatus::OnHold,
            TaskStatus::Completed,
        ] {
            assert_eq!(TaskStatus::try_from(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn onhold_wire_form_has_no_separator() {
        assert_eq!(TaskStatus::OnHold.as_str(), "ONHOLD");
        assert_eq!(
            serde_json::to_string(&TaskStatus::OnHold).expect("status should serialize"),
            "\"ONHOLD\""
        );
    }
}
