//! Shared world-building helpers for service tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;

use crate::tasking::access::ActorContext;
use crate::tasking::adapters::memory::{
    InMemoryCommentStore, InMemoryDirectory, InMemoryRatingStore, InMemoryTaskRepository,
    RecordingAuditSink, RecordingNotificationSink,
};
use crate::tasking::config::TaskPolicyConfig;
use crate::tasking::domain::{
    PersistedTaskData, Project, ProjectId, Role, Section, SectionId, Task, TaskId, TaskPriority,
    TaskStatus, UserAccount, UserId,
};
use crate::tasking::ports::TaskRepository;
use crate::tasking::services::{
    TaskLifecycleDeps, TaskLifecycleService, TaskListingService,
};

/// A fully wired in-memory deployment with one project and one actor per
/// role.
pub struct World {
    pub repository: Arc<InMemoryTaskRepository>,
    pub directory: Arc<InMemoryDirectory>,
    pub comments: Arc<InMemoryCommentStore>,
    pub ratings: Arc<InMemoryRatingStore>,
    pub audit: Arc<RecordingAuditSink>,
    pub notifier: Arc<RecordingNotificationSink>,
    pub config: Arc<TaskPolicyConfig>,
    pub lifecycle: TaskLifecycleService<DefaultClock>,
    pub listing: TaskListingService<DefaultClock>,
    pub super_admin: ActorContext,
    pub admin: ActorContext,
    pub lead: ActorContext,
    pub second_lead: ActorContext,
    pub contributor: ActorContext,
    pub intern: ActorContext,
    pub guest: ActorContext,
    pub project: ProjectId,
    pub section: SectionId,
}

pub fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn world() -> World {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let comments = Arc::new(InMemoryCommentStore::new());
    let ratings = Arc::new(InMemoryRatingStore::new());
    let audit = Arc::new(RecordingAuditSink::new());
    let notifier = Arc::new(RecordingNotificationSink::new());
    let config = Arc::new(TaskPolicyConfig::default());
    let clock = Arc::new(DefaultClock);

    let project = ProjectId::new();
    let section = SectionId::new();

    let make_actor = |role: Role, name: &str| {
        let id = UserId::new();
        directory
            .upsert_user(UserAccount {
                id,
                name: name.to_owned(),
                role,
                is_deleted: false,
            })
            .expect("user upsert should succeed");
        ActorContext::new(id, role).with_accessible_projects(vec![project])
    };

    let super_admin = make_actor(Role::SuperAdmin, "sasha");
    let admin = make_actor(Role::Admin, "amara");
    let lead = make_actor(Role::Lead, "lena");
    let second_lead = make_actor(Role::Lead, "liam");
    let contributor = make_actor(Role::Contributor, "cora");
    let intern = make_actor(Role::Intern, "ivo");
    let guest = make_actor(Role::Guest, "gus");

    directory
        .upsert_project(Project {
            id: project,
            name: "atlas".to_owned(),
            accessible_by: vec![contributor.id, intern.id],
            managed_by: vec![lead.id, second_lead.id],
            is_active: true,
            is_archived: false,
            is_deleted: false,
        })
        .expect("project upsert should succeed");
    directory
        .upsert_section(Section {
            id: section,
            project,
            name: "backlog".to_owned(),
            is_archived: false,
        })
        .expect("section upsert should succeed");

    let lifecycle = TaskLifecycleService::new(TaskLifecycleDeps {
        repository: repository.clone(),
        directory: directory.clone(),
        comments: comments.clone(),
        ratings: ratings.clone(),
        audit: audit.clone(),
        notifier: notifier.clone(),
        clock: clock.clone(),
        config: config.clone(),
    });
    let listing = TaskListingService::new(
        repository.clone(),
        directory.clone(),
        config.clone(),
        clock,
    );

    World {
        repository,
        directory,
        comments,
        ratings,
        audit,
        notifier,
        config,
        lifecycle,
        listing,
        super_admin,
        admin,
        lead,
        second_lead,
        contributor,
        intern,
        guest,
        project,
        section,
    }
}

impl World {
    /// Baseline persisted-task data: created by the lead, led by the lead,
    /// due tomorrow, not started.
    pub fn task_data(&self, assignee: Option<UserId>) -> PersistedTaskData {
        let now = Utc::now();
        PersistedTaskData {
            id: TaskId::new(),
            title: "triage inbox".to_owned(),
            description: None,
            status: TaskStatus::NotStarted,
            section: self.section,
            project: self.project,
            created_by: self.lead.id,
            assigned_to: assignee,
            lead: vec![self.lead.id],
            due_date: Some(tomorrow()),
            completed_date: None,
            priority: TaskPriority::Medium,
            is_deleted: false,
            rating: None,
            rated_by: None,
            is_delay_task: false,
            is_delay_rated: false,
            attachments: Vec::new(),
            comments: Vec::new(),
            rating_comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Persisted-task data already completed and ready to rate.
    pub fn completed_task_data(
        &self,
        assignee: UserId,
        due_date: DateTime<Utc>,
    ) -> PersistedTaskData {
        let mut data = self.task_data(Some(assignee));
        data.status = TaskStatus::Completed;
        data.due_date = Some(due_date);
        data.completed_date = Some(Utc::now());
        data
    }

    /// Inserts a fabricated task into the repository.
    pub async fn insert_task(&self, data: PersistedTaskData) -> Task {
        let task = Task::from_persisted(data);
        self.repository
            .insert(&task)
            .await
            .expect("task insert should succeed");
        task
    }
}
