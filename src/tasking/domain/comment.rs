//! Comment entity shared by task discussion and rating feedback.

use super::{CommentId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of comment, steering which task list it attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentKind {
    /// Regular discussion comment on a task.
    Task,
    /// Feedback attached while rating a task.
    Rating,
}

impl CommentKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Rating => "RATING",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CommentKind {
    type Error = ParseCommentKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TASK" => Ok(Self::Task),
            "RATING" => Ok(Self::Rating),
            _ => Err(ParseCommentKindError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a comment kind from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown comment kind: {0}")]
pub struct ParseCommentKindError(pub String);

/// A comment left on a task by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    author: UserId,
    body: String,
    kind: CommentKind,
    tagged_users: Vec<UserId>,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment.
    #[must_use]
    pub fn new(
        author: UserId,
        body: impl Into<String>,
        kind: CommentKind,
        tagged_users: Vec<UserId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: CommentId::new(),
            author,
            body: body.into(),
            kind,
            tagged_users,
            created_at: clock.utc(),
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the authoring user.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the comment kind.
    #[must_use]
    pub const fn kind(&self) -> CommentKind {
        self.kind
    }

    /// Returns the users tagged in the comment.
    #[must_use]
    pub fn tagged_users(&self) -> &[UserId] {
        &self.tagged_users
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
