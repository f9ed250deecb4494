//! Task aggregate root.

use super::{
    CommentId, CommentKind, ProjectId, RatingScore, SectionId, TaskDomainError, TaskId,
    TaskPatch, TaskPriority, TaskStatus, UserId, patch::FieldPatch,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for creating a task.
///
/// Field-level validation (title, lead list, due-date horizon) happens in
/// [`Task::create`]; role- and membership-based checks belong to the
/// authorization engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Initial status, already resolved against the configured default.
    pub status: TaskStatus,
    /// Section the task belongs to.
    pub section: SectionId,
    /// Project the task belongs to.
    pub project: ProjectId,
    /// Creating user.
    pub created_by: UserId,
    /// Optional assignee.
    pub assigned_to: Option<UserId>,
    /// Oversight leads; at least one is required.
    pub lead: Vec<UserId>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Scheduling priority.
    pub priority: TaskPriority,
    /// Attachment references.
    pub attachments: Vec<String>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted section.
    pub section: SectionId,
    /// Persisted project.
    pub project: ProjectId,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted assignee.
    pub assigned_to: Option<UserId>,
    /// Persisted lead set.
    pub lead: Vec<UserId>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted completion date.
    pub completed_date: Option<DateTime<Utc>>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted soft-delete flag.
    pub is_deleted: bool,
    /// Persisted rating, if any.
    pub rating: Option<RatingScore>,
    /// Persisted rater, if any.
    pub rated_by: Option<UserId>,
    /// Persisted late-completion flag.
    pub is_delay_task: bool,
    /// Persisted late-rating flag.
    pub is_delay_rated: bool,
    /// Persisted attachment references.
    pub attachments: Vec<String>,
    /// Persisted task comment identifiers, in append order.
    pub comments: Vec<CommentId>,
    /// Persisted rating comment identifiers, in append order.
    pub rating_comments: Vec<CommentId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    section: SectionId,
    project: ProjectId,
    created_by: UserId,
    assigned_to: Option<UserId>,
    lead: Vec<UserId>,
    due_date: Option<DateTime<Utc>>,
    completed_date: Option<DateTime<Utc>>,
    priority: TaskPriority,
    is_deleted: bool,
    rating: Option<RatingScore>,
    rated_by: Option<UserId>,
    is_delay_task: bool,
    is_delay_rated: bool,
    attachments: Vec<String>,
    comments: Vec<CommentId>,
    rating_comments: Vec<CommentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title,
    /// [`TaskDomainError::MissingLead`] for an empty lead list, and
    /// [`TaskDomainError::DueDateBeforeToday`] when the due date falls
    /// before the current calendar day.
    pub fn create(input: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = input.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if input.lead.is_empty() {
            return Err(TaskDomainError::MissingLead);
        }

        let timestamp = clock.utc();
        if let Some(due) = input.due_date {
            let today = timestamp.date_naive();
            if due.date_naive() < today {
                return Err(TaskDomainError::DueDateBeforeToday {
                    due: due.date_naive(),
                    today,
                });
            }
        }

        Ok(Self {
            id: TaskId::new(),
            title,
            description: input.description,
            status: input.status,
            section: input.section,
            project: input.project,
            created_by: input.created_by,
            assigned_to: input.assigned_to,
            lead: input.lead,
            due_date: input.due_date,
            completed_date: None,
            priority: input.priority,
            is_deleted: false,
            rating: None,
            rated_by: None,
            is_delay_task: false,
            is_delay_rated: false,
            attachments: input.attachments,
            comments: Vec::new(),
            rating_comments: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            section: data.section,
            project: data.project,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            lead: data.lead,
            due_date: data.due_date,
            completed_date: data.completed_date,
            priority: data.priority,
            is_deleted: data.is_deleted,
            rating: data.rating,
            rated_by: data.rated_by,
            is_delay_task: data.is_delay_task,
            is_delay_rated: data.is_delay_rated,
            attachments: data.attachments,
            comments: data.comments,
            rating_comments: data.rating_comments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owning section.
    #[must_use]
    pub const fn section(&self) -> SectionId {
        self.section
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the oversight leads.
    #[must_use]
    pub fn lead(&self) -> &[UserId] {
        &self.lead
    }

    /// Returns whether the given user is listed as a lead.
    #[must_use]
    pub fn has_lead(&self, user: UserId) -> bool {
        self.lead.contains(&user)
    }

    /// Returns whether the given user created, is assigned to, or leads
    /// this task.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.created_by == user || self.assigned_to == Some(user) || self.has_lead(user)
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the completion date, if any.
    #[must_use]
    pub const fn completed_date(&self) -> Option<DateTime<Utc>> {
        self.completed_date
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns whether the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the rating, if any.
    #[must_use]
    pub const fn rating(&self) -> Option<RatingScore> {
        self.rating
    }

    /// Returns whether the task carries a rating.
    #[must_use]
    pub const fn is_rated(&self) -> bool {
        self.rating.is_some()
    }

    /// Returns the rating user, if any.
    #[must_use]
    pub const fn rated_by(&self) -> Option<UserId> {
        self.rated_by
    }

    /// Returns whether the task was completed after its due date.
    #[must_use]
    pub const fn is_delay_task(&self) -> bool {
        self.is_delay_task
    }

    /// Returns whether the task was rated outside the grace window.
    #[must_use]
    pub const fn is_delay_rated(&self) -> bool {
        self.is_delay_rated
    }

    /// Returns the attachment references.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns the task comment identifiers in append order.
    #[must_use]
    pub fn comments(&self) -> &[CommentId] {
        &self.comments
    }

    /// Returns the rating comment identifiers in append order.
    #[must_use]
    pub fn rating_comments(&self) -> &[CommentId] {
        &self.rating_comments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the completion date landed after the due date.
    #[must_use]
    pub fn completed_after_due(&self) -> bool {
        match (self.completed_date, self.due_date) {
            (Some(completed), Some(due)) => completed > due,
            _ => false,
        }
    }

    /// Transitions the task to a new status.
    ///
    /// Completing a task stamps the completion date and records whether
    /// completion landed past the due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusLockedByRating`] for rated tasks,
    /// [`TaskDomainError::CompletedStatusIsTerminal`] when the task is
    /// already completed, and [`TaskDomainError::CompletionRequiresDueDate`]
    /// when completion is requested without a due date.
    pub fn transition_status(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.is_rated() {
            return Err(TaskDomainError::StatusLockedByRating(self.id));
        }
        if !self.status.can_transition() {
            return Err(TaskDomainError::CompletedStatusIsTerminal(self.id));
        }

        if target.is_completed() {
            let due = self
                .due_date
                .ok_or(TaskDomainError::CompletionRequiresDueDate(self.id))?;
            let now = clock.utc();
            self.completed_date = Some(now);
            self.is_delay_task = now > due;
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Records a rating on the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyRated`] when a rating exists, and
    /// the `RatingRequires*` variants when the task is not completed, has
    /// no due date, or has no assignee.
    pub fn apply_rating(
        &mut self,
        score: RatingScore,
        rated_by: UserId,
        delay_rated: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.is_rated() {
            return Err(TaskDomainError::AlreadyRated(self.id));
        }
        if !self.status.is_completed() || self.completed_date.is_none() {
            return Err(TaskDomainError::RatingRequiresCompletion(self.id));
        }
        if self.due_date.is_none() {
            return Err(TaskDomainError::RatingRequiresDueDate(self.id));
        }
        if self.assigned_to.is_none() {
            return Err(TaskDomainError::RatingRequiresAssignee(self.id));
        }

        self.rating = Some(score);
        self.rated_by = Some(rated_by);
        self.is_delay_rated = delay_rated;
        self.touch(clock);
        Ok(())
    }

    /// Marks the task as deleted without removing the record.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        self.is_deleted = true;
        self.touch(clock);
    }

    /// Appends a comment identifier to the matching comment list.
    ///
    /// Duplicate identifiers are ignored, mirroring set-append semantics
    /// in the backing store.
    pub fn attach_comment(&mut self, kind: CommentKind, comment: CommentId, clock: &impl Clock) {
        let list = match kind {
            CommentKind::Task => &mut self.comments,
            CommentKind::Rating => &mut self.rating_comments,
        };
        if !list.contains(&comment) {
            list.push(comment);
        }
        self.touch(clock);
    }

    /// Applies a partial update, touching only fields the patch carries.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        apply_required(&mut self.title, &patch.title);
        apply_optional(&mut self.description, &patch.description);
        apply_required(&mut self.section, &patch.section);
        apply_required(&mut self.project, &patch.project);
        apply_required(&mut self.status, &patch.status);
        apply_optional(&mut self.due_date, &patch.due_date);
        apply_optional(&mut self.completed_date, &patch.completed_date);
        apply_required(&mut self.priority, &patch.priority);
        apply_optional(&mut self.assigned_to, &patch.assigned_to);
        apply_required(&mut self.lead, &patch.lead);
        apply_required(&mut self.attachments, &patch.attachments);
        apply_required(&mut self.is_deleted, &patch.is_deleted);
        apply_required(&mut self.is_delay_task, &patch.is_delay_task);
        apply_required(&mut self.is_delay_rated, &patch.is_delay_rated);
        apply_optional(&mut self.rating, &patch.rating);
        apply_optional(&mut self.rated_by, &patch.rated_by);

        if let Some(comment) = patch.append_comment {
            if !self.comments.contains(&comment) {
                self.comments.push(comment);
            }
        }
        if let Some(comment) = patch.append_rating_comment {
            if !self.rating_comments.contains(&comment) {
                self.rating_comments.push(comment);
            }
        }
        if let Some(touched_at) = patch.touched_at {
            self.updated_at = touched_at;
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Applies a patch field to a required attribute; `Clear` is meaningless
/// for required attributes and is ignored.
fn apply_required<T: Clone>(slot: &mut T, patch: &FieldPatch<T>) {
    if let FieldPatch::Set(value) = patch {
        *slot = value.clone();
    }
}

/// Applies a patch field to an optional attribute.
fn apply_optional<T: Clone>(slot: &mut Option<T>, patch: &FieldPatch<T>) {
    match patch {
        FieldPatch::Keep => {}
        FieldPatch::Set(value) => *slot = Some(value.clone()),
        FieldPatch::Clear => *slot = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mockable::DefaultClock;

    fn draft(due_date: Option<DateTime<Utc>>) -> NewTask {
        NewTask {
            title: "Prepare launch checklist".to_owned(),
            description: None,
            status: TaskStatus::NotStarted,
            section: SectionId::new(),
            project: ProjectId::new(),
            created_by: UserId::new(),
            assigned_to: Some(UserId::new()),
            lead: vec![UserId::new()],
            due_date,
            priority: TaskPriority::Medium,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn create_rejects_blank_title() {
        let clock = DefaultClock;
        let mut input = draft(None);
        input.title = "   ".to_owned();
        assert_eq!(
            Task::create(input, &clock),
            Err(TaskDomainError::EmptyTitle)
        );
    }

    #[test]
    fn create_rejects_empty_lead_list() {
        let clock = DefaultClock;
        let mut input = draft(None);
        input.lead.clear();
        assert_eq!(
            Task::create(input, &clock),
            Err(TaskDomainError::MissingLead)
        );
    }

    #[test]
    fn create_rejects_due_date_before_today() {
        let clock = DefaultClock;
        let input = draft(Some(Utc::now() - Duration::days(2)));
        assert!(matches!(
            Task::create(input, &clock),
            Err(TaskDomainError::DueDateBeforeToday { .. })
        ));
    }

    #[test]
    fn create_accepts_due_date_later_today() {
        let clock = DefaultClock;
        let input = draft(Some(Utc::now() + Duration::hours(1)));
        let task = Task::create(input, &clock).expect("task should be created");
        assert_eq!(task.status(), TaskStatus::NotStarted);
        assert!(!task.is_deleted());
        assert!(task.completed_date().is_none());
    }

    #[test]
    fn completing_after_due_date_flags_delay() {
        let clock = DefaultClock;
        let mut task =
            Task::create(draft(Some(Utc::now() + Duration::hours(1))), &clock)
                .expect("task should be created");
        // Push the due date into the past without tripping create validation.
        task.due_date = Some(Utc::now() - Duration::days(1));

        task.transition_status(TaskStatus::Completed, &clock)
            .expect("completion should succeed");

        assert!(task.is_delay_task());
        assert!(task.completed_date().is_some());
        assert_eq!(task.status(), TaskStatus::Completed);
    }

    #[test]
    fn completion_without_due_date_is_rejected() {
        let clock = DefaultClock;
        let mut task = Task::create(draft(None), &clock).expect("task should be created");
        assert!(matches!(
            task.transition_status(TaskStatus::Completed, &clock),
            Err(TaskDomainError::CompletionRequiresDueDate(_))
        ));
    }

    #[test]
    fn rated_task_status_is_locked() {
        let clock = DefaultClock;
        let mut task =
            Task::create(draft(Some(Utc::now() + Duration::hours(1))), &clock)
                .expect("task should be created");
        task.transition_status(TaskStatus::Completed, &clock)
            .expect("completion should succeed");
        let rater = UserId::new();
        task.apply_rating(
            RatingScore::new(5).expect("score should be valid"),
            rater,
            false,
            &clock,
        )
        .expect("rating should succeed");

        assert!(matches!(
            task.transition_status(TaskStatus::Ongoing, &clock),
            Err(TaskDomainError::StatusLockedByRating(_))
        ));
    }

    #[test]
    fn rating_requires_completion() {
        let clock = DefaultClock;
        let mut task =
            Task::create(draft(Some(Utc::now() + Duration::hours(1))), &clock)
                .expect("task should be created");
        let result = task.apply_rating(
            RatingScore::new(4).expect("score should be valid"),
            UserId::new(),
            false,
            &clock,
        );
        assert!(matches!(
            result,
            Err(TaskDomainError::RatingRequiresCompletion(_))
        ));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let clock = DefaultClock;
        let mut input = draft(None);
        input.description = Some("original description".to_owned());
        let mut task = Task::create(input, &clock).expect("task should be created");

        let patch = TaskPatch {
            title: FieldPatch::Set("Renamed".to_owned()),
            due_date: FieldPatch::Clear,
            ..TaskPatch::default()
        };
        task.apply_patch(&patch);

        assert_eq!(task.title(), "Renamed");
        assert_eq!(task.description(), Some("original description"));
        assert!(task.due_date().is_none());
    }
}
