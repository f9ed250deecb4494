//! Task lifecycle orchestration: validate, authorize, mutate, audit.

use super::{
    ConflictError, MissingEntity, RatingAggregator, TaskServiceError, TaskServiceResult,
    ValidationError, keyed_lock::KeyedLock,
};
use crate::tasking::access::{AccessDenial, AccessPolicy, ActorContext, AssignmentFacts};
use crate::tasking::config::TaskPolicyConfig;
use crate::tasking::domain::{
    AuditAction, AuditEntry, Comment, CommentKind, FieldPatch, NewTask, ProjectId,
    RatingAggregate, RatingScore, Role, SectionId, Task, TaskDiff, TaskDomainError, TaskField,
    TaskId, TaskPatch, TaskPriority, TaskStatus, UserId,
};
use crate::tasking::ports::{
    AssignmentNotice, AuditSink, AuditSinkError, CommentStore, NotificationSink, OrgDirectory,
    RatingStore, ReturnDocument, TaskRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of a mutation whose audit append may have failed.
///
/// The mutation itself succeeded in both variants; callers decide whether
/// a dropped audit entry still counts as success.
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// Mutation applied and audit entry recorded.
    Completed(T),
    /// Mutation applied but the audit append failed.
    AuditLogDropped {
        /// The mutation result.
        value: T,
        /// Why the audit append failed.
        reason: AuditSinkError,
    },
}

impl<T> MutationOutcome<T> {
    /// Returns the mutation result regardless of audit fate.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Completed(value) | Self::AuditLogDropped { value, .. } => value,
        }
    }

    /// Consumes the outcome, returning the mutation result.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Completed(value) | Self::AuditLogDropped { value, .. } => value,
        }
    }

    /// Returns whether the audit entry landed.
    #[must_use]
    pub const fn audit_recorded(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    section: SectionId,
    project: ProjectId,
    assigned_to: Option<UserId>,
    lead: Vec<UserId>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<TaskPriority>,
    attachments: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, project: ProjectId, section: SectionId) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            section,
            project,
            assigned_to: None,
            lead: Vec::new(),
            due_date: None,
            priority: None,
            attachments: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the configured default status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the oversight leads.
    #[must_use]
    pub fn with_leads(mut self, leads: impl IntoIterator<Item = UserId>) -> Self {
        self.lead = leads.into_iter().collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets attachment references.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }
}

/// Request payload for a partial task edit.
///
/// Attributes left at [`FieldPatch::Keep`] are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    /// The task to edit.
    pub task: TaskId,
    /// Title replacement.
    pub title: FieldPatch<String>,
    /// Description replacement or removal.
    pub description: FieldPatch<String>,
    /// Section replacement.
    pub section: FieldPatch<SectionId>,
    /// Status replacement.
    pub status: FieldPatch<TaskStatus>,
    /// Due date replacement or removal.
    pub due_date: FieldPatch<DateTime<Utc>>,
    /// Priority replacement.
    pub priority: FieldPatch<TaskPriority>,
    /// Assignee replacement or removal.
    pub assigned_to: FieldPatch<UserId>,
    /// Lead list replacement.
    pub lead: FieldPatch<Vec<UserId>>,
    /// Attachment list replacement.
    pub attachments: FieldPatch<Vec<String>>,
}

impl EditTaskRequest {
    /// Creates an edit request that changes nothing yet.
    #[must_use]
    pub const fn new(task: TaskId) -> Self {
        Self {
            task,
            title: FieldPatch::Keep,
            description: FieldPatch::Keep,
            section: FieldPatch::Keep,
            status: FieldPatch::Keep,
            due_date: FieldPatch::Keep,
            priority: FieldPatch::Keep,
            assigned_to: FieldPatch::Keep,
            lead: FieldPatch::Keep,
            attachments: FieldPatch::Keep,
        }
    }

    fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: self.title,
            description: self.description,
            section: self.section,
            status: self.status,
            due_date: self.due_date,
            priority: self.priority,
            assigned_to: self.assigned_to,
            lead: self.lead,
            attachments: self.attachments,
            ..TaskPatch::default()
        }
    }
}

/// Request payload for rating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTaskRequest {
    /// The task to rate.
    pub task: TaskId,
    /// Raw rating value; validated into the 1-6 range.
    pub rating: u8,
    /// Optional feedback comment recorded alongside the rating.
    pub comment: Option<String>,
    /// Users tagged in the feedback comment.
    pub tagged_users: Vec<UserId>,
}

impl RateTaskRequest {
    /// Creates a rating request.
    #[must_use]
    pub const fn new(task: TaskId, rating: u8) -> Self {
        Self {
            task,
            rating,
            comment: None,
            tagged_users: Vec::new(),
        }
    }

    /// Attaches a feedback comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Tags users in the feedback comment.
    #[must_use]
    pub fn with_tagged_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.tagged_users = users.into_iter().collect();
        self
    }
}

/// Collaborators wired into the lifecycle service.
pub struct TaskLifecycleDeps<C>
where
    C: Clock + Send + Sync,
{
    /// Task persistence.
    pub repository: Arc<dyn TaskRepository>,
    /// Project/user directory.
    pub directory: Arc<dyn OrgDirectory>,
    /// Comment persistence.
    pub comments: Arc<dyn CommentStore>,
    /// Rating aggregate persistence.
    pub ratings: Arc<dyn RatingStore>,
    /// Audit trail sink.
    pub audit: Arc<dyn AuditSink>,
    /// Assignment notification sink.
    pub notifier: Arc<dyn NotificationSink>,
    /// Time source.
    pub clock: Arc<C>,
    /// Runtime policy.
    pub config: Arc<TaskPolicyConfig>,
}

/// Task lifecycle orchestration service.
///
/// Every mutation follows validate, authorize, mutate, audit. Mutations of
/// one task serialize on a per-task lock so the read-modify-write sequence
/// is effectively atomic per task document.
pub struct TaskLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    repository: Arc<dyn TaskRepository>,
    directory: Arc<dyn OrgDirectory>,
    comments: Arc<dyn CommentStore>,
    audit: Arc<dyn AuditSink>,
    notifier: Arc<dyn NotificationSink>,
    aggregator: RatingAggregator,
    clock: Arc<C>,
    config: Arc<TaskPolicyConfig>,
    task_locks: KeyedLock<TaskId>,
}

impl<C> TaskLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub fn new(deps: TaskLifecycleDeps<C>) -> Self {
        let aggregator = RatingAggregator::new(Arc::clone(&deps.repository), deps.ratings);
        Self {
            repository: deps.repository,
            directory: deps.directory,
            comments: deps.comments,
            audit: deps.audit,
            notifier: deps.notifier,
            aggregator,
            clock: deps.clock,
            config: deps.config,
            task_locks: KeyedLock::new(),
        }
    }

    /// Returns the runtime policy the service was built with.
    #[must_use]
    pub fn config(&self) -> &TaskPolicyConfig {
        &self.config
    }

    /// Creates a task.
    ///
    /// Contributors always self-assign; a missing due date then defaults
    /// to the end of the current UTC day.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] on missing fields, a past due date, an
    /// unavailable project, or an authorization denial.
    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<MutationOutcome<Task>> {
        if request.title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle.into());
        }
        if request.lead.is_empty() {
            return Err(TaskDomainError::MissingLead.into());
        }
        let now = self.clock.utc();
        if let Some(due) = request.due_date
            && due.date_naive() < now.date_naive()
        {
            return Err(TaskDomainError::DueDateBeforeToday {
                due: due.date_naive(),
                today: now.date_naive(),
            }
            .into());
        }

        let mut assigned_to = request.assigned_to;
        let mut due_date = request.due_date;
        if matches!(actor.role, Role::Contributor) {
            assigned_to = Some(actor.id);
            if due_date.is_none() {
                due_date = Some(end_of_day(now));
            }
        }

        let project = self
            .directory
            .find_project(request.project)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Project(
                request.project,
            )))?;
        project
            .ensure_accepts_tasks()
            .map_err(ConflictError::Project)?;

        let policy = AccessPolicy::new(&self.config.roles);
        policy.authorize_create(actor, &project, &request.lead)?;

        if let Some(assignee) = assigned_to {
            let assignee_role = self.role_of(assignee).await?;
            for lead in &request.lead {
                let lead_role = self.role_of(*lead).await?;
                policy.authorize_lead_and_assignee(&AssignmentFacts {
                    actor_role: actor.role,
                    lead: *lead,
                    lead_role,
                    assignee,
                    assignee_role,
                })?;
            }
        }

        let status = request
            .status
            .unwrap_or_else(|| self.config.default_status());
        let task = Task::create(
            NewTask {
                title: request.title,
                description: request.description,
                status,
                section: request.section,
                project: request.project,
                created_by: actor.id,
                assigned_to,
                lead: request.lead,
                due_date,
                priority: request.priority.unwrap_or_default(),
                attachments: request.attachments,
            },
            &*self.clock,
        )?;
        self.repository.insert(&task).await?;

        if let Some(assignee) = assigned_to
            && assignee != actor.id
        {
            let notice = AssignmentNotice {
                task: task.id(),
                title: task.title().to_owned(),
                project: project.id,
                project_name: project.name.clone(),
                assignee,
                assigned_by: actor.id,
                link_token: assignment_link_token(task.id()),
            };
            if let Err(err) = self.notifier.notify_assignment(notice).await {
                tracing::warn!(task = %task.id(), error = %err, "assignment notification failed");
            }
        }

        let entry = AuditEntry::new(AuditAction::TaskAdded, actor.id, task.id(), &*self.clock);
        Ok(self.record_audit(entry, task).await)
    }

    /// Applies a partial edit to a task.
    ///
    /// Only supplied attributes change. Setting status to completed
    /// requires a due date and stamps the completion date. The audit entry
    /// carries previous/new pairs for changed attributes only, classified
    /// with status changes outranking due-date changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is missing, completed
    /// (below super-admin), rated and the actor too junior, or the
    /// lead/assignee pairing violates seniority rules.
    pub async fn edit(
        &self,
        actor: &ActorContext,
        request: EditTaskRequest,
    ) -> TaskServiceResult<MutationOutcome<Task>> {
        let _guard = self.task_locks.acquire(request.task).await;

        let task = self
            .repository
            .find_by_id(request.task)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(
                request.task,
            )))?;

        let creator_role = self.role_of(task.created_by()).await?;
        let policy = AccessPolicy::new(&self.config.roles);
        policy.authorize_edit(actor, &task, creator_role)?;

        if task.status().is_completed() && !actor.is_super_admin() {
            return Err(ConflictError::CompletedTaskImmutable(task.id()).into());
        }

        if let FieldPatch::Set(leads) = &request.lead {
            let effective_assignee = match &request.assigned_to {
                FieldPatch::Set(user) => Some(*user),
                FieldPatch::Clear => None,
                FieldPatch::Keep => task.assigned_to(),
            };
            if let Some(assignee) = effective_assignee {
                let assignee_role = self.role_of(assignee).await?;
                for lead in leads {
                    let lead_role = self.role_of(*lead).await?;
                    policy.authorize_lead_and_assignee(&AssignmentFacts {
                        actor_role: actor.role,
                        lead: *lead,
                        lead_role,
                        assignee,
                        assignee_role,
                    })?;
                }
            }
            self.ensure_leads_manage_project(task.project(), leads)
                .await?;
        }

        let mut patch = request.into_patch();
        let requested_status = patch.status.as_set().copied();
        if let Some(target) = requested_status
            && target != task.status()
        {
            if task.is_rated() {
                return Err(TaskDomainError::StatusLockedByRating(task.id()).into());
            }
            if target.is_completed() {
                let due = match &patch.due_date {
                    FieldPatch::Set(date) => Some(*date),
                    FieldPatch::Clear => None,
                    FieldPatch::Keep => task.due_date(),
                };
                let due =
                    due.ok_or_else(|| {
                        TaskServiceError::from(TaskDomainError::CompletionRequiresDueDate(
                            task.id(),
                        ))
                    })?;
                let now = self.clock.utc();
                patch.completed_date = FieldPatch::Set(now);
                patch.is_delay_task = FieldPatch::Set(now > due);
            }
        }
        patch.touched_at = Some(self.clock.utc());

        let previous = self
            .repository
            .update(task.id(), &patch, ReturnDocument::Previous)
            .await?;
        let mut updated = previous.clone();
        updated.apply_patch(&patch);

        let diff = TaskDiff::between(&previous, &updated);
        let entry = AuditEntry::new(diff.audit_action(), actor.id, task.id(), &*self.clock)
            .with_changes(diff.previous_values(), diff.new_values());
        Ok(self.record_audit(entry, updated).await)
    }

    /// Transitions a task's status.
    ///
    /// Completion requires a due date, stamps the completion date, and
    /// flags late completion. Rated tasks always conflict.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is missing, unassigned,
    /// rated, already completed, or the actor lacks standing.
    pub async fn update_status(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        target: TaskStatus,
    ) -> TaskServiceResult<MutationOutcome<Task>> {
        let _guard = self.task_locks.acquire(task_id).await;

        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(task_id)))?;
        let assignee = task
            .assigned_to()
            .ok_or(ConflictError::TaskUnassigned(task_id))?;

        let assignee_role = self.role_of(assignee).await?;
        let policy = AccessPolicy::new(&self.config.roles);
        policy.authorize_status_update(actor, &task, assignee_role)?;

        let previous_status = task.status();
        let mut transitioned = task.clone();
        transitioned.transition_status(target, &*self.clock)?;

        let mut patch = TaskPatch {
            status: FieldPatch::Set(target),
            touched_at: Some(self.clock.utc()),
            ..TaskPatch::default()
        };
        if target.is_completed() {
            if let Some(completed) = transitioned.completed_date() {
                patch.completed_date = FieldPatch::Set(completed);
            }
            patch.is_delay_task = FieldPatch::Set(transitioned.is_delay_task());
        }
        let stored = self
            .repository
            .update(task_id, &patch, ReturnDocument::Updated)
            .await?;

        if previous_status == target {
            return Ok(MutationOutcome::Completed(stored));
        }

        let mut previous_values = BTreeMap::new();
        previous_values.insert(TaskField::Status, Value::from(previous_status.as_str()));
        let mut new_values = BTreeMap::new();
        new_values.insert(TaskField::Status, Value::from(target.as_str()));
        let entry = AuditEntry::new(
            AuditAction::TaskStatusUpdated,
            actor.id,
            task_id,
            &*self.clock,
        )
        .with_changes(previous_values, new_values);
        Ok(self.record_audit(entry, stored).await)
    }

    /// Soft-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is missing, completed or
    /// rated (below super-admin), or the creator outranks the actor.
    pub async fn delete(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
    ) -> TaskServiceResult<MutationOutcome<Task>> {
        let _guard = self.task_locks.acquire(task_id).await;

        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(task_id)))?;

        if !actor.is_super_admin() && (task.status().is_completed() || task.is_rated()) {
            return Err(ConflictError::CompletedOrRatedTaskUndeletable(task_id).into());
        }

        let creator_role = self.role_of(task.created_by()).await?;
        let policy = AccessPolicy::new(&self.config.roles);
        policy.authorize_delete(actor, &task, creator_role)?;

        let patch = TaskPatch {
            is_deleted: FieldPatch::Set(true),
            touched_at: Some(self.clock.utc()),
            ..TaskPatch::default()
        };
        let deleted = self
            .repository
            .update(task_id, &patch, ReturnDocument::Updated)
            .await?;

        let entry = AuditEntry::new(AuditAction::TaskDeleted, actor.id, task_id, &*self.clock);
        Ok(self.record_audit(entry, deleted).await)
    }

    /// Adds a discussion comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the text is empty or the task is
    /// missing.
    pub async fn comment(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        body: &str,
        tagged_users: Vec<UserId>,
    ) -> TaskServiceResult<MutationOutcome<Comment>> {
        let text = body.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }

        let _guard = self.task_locks.acquire(task_id).await;
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(task_id)))?;

        let comment = Comment::new(actor.id, text, CommentKind::Task, tagged_users, &*self.clock);
        self.comments.insert(&comment).await?;

        let patch = TaskPatch {
            append_comment: Some(comment.id()),
            touched_at: Some(self.clock.utc()),
            ..TaskPatch::default()
        };
        self.repository
            .update(task.id(), &patch, ReturnDocument::Updated)
            .await?;

        let entry = AuditEntry::new(AuditAction::TaskComment, actor.id, task_id, &*self.clock)
            .with_comment(comment.id());
        Ok(self.record_audit(entry, comment).await)
    }

    /// Rates a completed task and recomputes its cohort aggregate.
    ///
    /// The 1-6 range is validated before anything is persisted. A rating
    /// landing more than the configured grace window past the due date
    /// marks the task delay-rated without blocking the rating.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the value is out of range, the
    /// task is missing, not completed, unassigned, undated, already rated,
    /// or the actor may not rate it.
    pub async fn rate(
        &self,
        actor: &ActorContext,
        request: RateTaskRequest,
    ) -> TaskServiceResult<MutationOutcome<RatingAggregate>> {
        let score = RatingScore::new(request.rating)?;

        let _guard = self.task_locks.acquire(request.task).await;
        let task = self
            .repository
            .find_by_id(request.task)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(
                request.task,
            )))?;

        if task.is_rated() {
            return Err(TaskDomainError::AlreadyRated(task.id()).into());
        }
        if !task.status().is_completed() || task.completed_date().is_none() {
            return Err(TaskDomainError::RatingRequiresCompletion(task.id()).into());
        }
        let due = task
            .due_date()
            .ok_or(TaskDomainError::RatingRequiresDueDate(task.id()))?;
        let assignee = task
            .assigned_to()
            .ok_or(TaskDomainError::RatingRequiresAssignee(task.id()))?;

        let policy = AccessPolicy::new(&self.config.roles);
        policy.authorize_rate(actor, &task)?;

        let now = self.clock.utc();
        let delay_rated = (now - due).num_hours() > self.config.rating_grace_hours;

        let comment_id = match &request.comment {
            Some(body) => {
                let text = body.trim();
                if text.is_empty() {
                    return Err(ValidationError::EmptyComment.into());
                }
                let comment = Comment::new(
                    actor.id,
                    text,
                    CommentKind::Rating,
                    request.tagged_users.clone(),
                    &*self.clock,
                );
                self.comments.insert(&comment).await?;
                Some(comment.id())
            }
            None => None,
        };

        let patch = TaskPatch {
            rating: FieldPatch::Set(score),
            rated_by: FieldPatch::Set(actor.id),
            is_delay_rated: FieldPatch::Set(delay_rated),
            append_rating_comment: comment_id,
            touched_at: Some(now),
            ..TaskPatch::default()
        };
        self.repository
            .update(task.id(), &patch, ReturnDocument::Updated)
            .await?;

        let aggregate = self.aggregator.recompute(assignee, due).await?;

        let mut entry = AuditEntry::new(AuditAction::RateTask, actor.id, task.id(), &*self.clock)
            .with_rating(aggregate.id())
            .with_subject_user(assignee);
        if let Some(comment) = comment_id {
            entry = entry.with_comment(comment);
        }
        Ok(self.record_audit(entry, aggregate).await)
    }

    /// Returns a single non-deleted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// soft-deleted.
    pub async fn task_details(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Task(task_id)))
    }

    /// Resolves a user's role, denying when the account is unknown.
    async fn role_of(&self, user: UserId) -> TaskServiceResult<Role> {
        let account = self
            .directory
            .find_user(user)
            .await?
            .ok_or(TaskServiceError::Forbidden(AccessDenial::PrincipalNotFound {
                user,
            }))?;
        Ok(account.role)
    }

    /// Requires every requested lead to manage the project.
    ///
    /// Administrative leads are exempt; deleted accounts always deny.
    async fn ensure_leads_manage_project(
        &self,
        project_id: ProjectId,
        leads: &[UserId],
    ) -> TaskServiceResult<()> {
        let project = self
            .directory
            .find_project(project_id)
            .await?
            .ok_or(TaskServiceError::NotFound(MissingEntity::Project(
                project_id,
            )))?;
        for lead in leads {
            let account = self.directory.find_user(*lead).await?.ok_or(
                TaskServiceError::Forbidden(AccessDenial::PrincipalNotFound { user: *lead }),
            )?;
            if account.is_deleted {
                return Err(TaskServiceError::Forbidden(AccessDenial::PrincipalNotFound {
                    user: *lead,
                }));
            }
            if matches!(account.role, Role::Admin | Role::SuperAdmin) {
                continue;
            }
            if !project.is_managed_by(*lead) {
                return Err(TaskServiceError::Forbidden(
                    AccessDenial::LeadNotProjectManager {
                        lead: *lead,
                        project: project_id,
                    },
                ));
            }
        }
        Ok(())
    }

    /// Appends the audit entry, downgrading failure to a partial success.
    async fn record_audit<T>(&self, entry: AuditEntry, value: T) -> MutationOutcome<T> {
        match self.audit.append(entry).await {
            Ok(()) => MutationOutcome::Completed(value),
            Err(reason) => {
                tracing::warn!(error = %reason, "audit append failed after successful mutation");
                MutationOutcome::AuditLogDropped { value, reason }
            }
        }
    }
}

/// Deep-link token for assignment notices, derived from the task id.
fn assignment_link_token(task: TaskId) -> String {
    let digest = Sha256::digest(task.into_inner().as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Last second of the day `now` falls on.
fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(23, 59, 59)
        .map_or(now, |timestamp| timestamp.and_utc())
}
