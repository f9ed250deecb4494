//! End-to-end task flow over the public API and in-memory adapters.

use std::sync::Arc;

use chrono::{Duration, Utc};
use gantt::tasking::access::ActorContext;
use gantt::tasking::adapters::memory::{
    InMemoryCommentStore, InMemoryDirectory, InMemoryRatingStore, InMemoryTaskRepository,
    RecordingAuditSink, RecordingNotificationSink,
};
use gantt::tasking::config::TaskPolicyConfig;
use gantt::tasking::domain::{
    AuditAction, Project, ProjectId, Role, Section, SectionId, TaskStatus, UserAccount, UserId,
};
use gantt::tasking::services::{
    CreateTaskRequest, RateTaskRequest, TaskLifecycleDeps, TaskLifecycleService, TaskListQuery,
    TaskListingService,
};
use mockable::DefaultClock;

struct Deployment {
    lifecycle: TaskLifecycleService<DefaultClock>,
    listing: TaskListingService<DefaultClock>,
    audit: Arc<RecordingAuditSink>,
    notifier: Arc<RecordingNotificationSink>,
    lead: ActorContext,
    contributor: ActorContext,
    project: ProjectId,
    section: SectionId,
}

fn deploy() -> Deployment {
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
    let lead_id = UserId::new();
    let contributor_id = UserId::new();

    directory
        .upsert_user(UserAccount {
            id: lead_id,
            name: "lena".to_owned(),
            role: Role::Lead,
            is_deleted: false,
        })
        .expect("user upsert should succeed");
    directory
        .upsert_user(UserAccount {
            id: contributor_id,
            name: "cora".to_owned(),
            role: Role::Contributor,
            is_deleted: false,
        })
        .expect("user upsert should succeed");
    directory
        .upsert_project(Project {
            id: project,
            name: "atlas".to_owned(),
            accessible_by: vec![contributor_id],
            managed_by: vec![lead_id],
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
        comments,
        ratings,
        audit: audit.clone(),
        notifier: notifier.clone(),
        clock: clock.clone(),
        config: config.clone(),
    });
    let listing = TaskListingService::new(repository, directory, config, clock);

    Deployment {
        lifecycle,
        listing,
        audit,
        notifier,
        lead: ActorContext::new(lead_id, Role::Lead).with_accessible_projects(vec![project]),
        contributor: ActorContext::new(contributor_id, Role::Contributor)
            .with_accessible_projects(vec![project]),
        project,
        section,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_progress_complete_rate_and_report() {
    let deployment = deploy();

    let request = CreateTaskRequest::new(
        "assemble launch deck",
        deployment.project,
        deployment.section,
    )
    .with_leads([deployment.lead.id])
    .with_assignee(deployment.contributor.id)
    .with_due_date(Utc::now() + Duration::hours(4));
    let created = deployment
        .lifecycle
        .create(&deployment.lead, request)
        .await
        .expect("create should succeed");
    let task_id = created.value().id();

    assert_eq!(created.value().status(), TaskStatus::NotStarted);
    assert_eq!(
        deployment.notifier.notices().expect("notices").len(),
        1,
        "assignment to someone else sends a notice"
    );

    deployment
        .lifecycle
        .update_status(&deployment.contributor, task_id, TaskStatus::Ongoing)
        .await
        .expect("start should succeed");
    let completed = deployment
        .lifecycle
        .update_status(&deployment.contributor, task_id, TaskStatus::Completed)
        .await
        .expect("completion should succeed");
    assert!(completed.value().completed_date().is_some());
    assert!(!completed.value().is_delay_task());

    deployment
        .lifecycle
        .comment(&deployment.lead, task_id, "nice pacing", Vec::new())
        .await
        .expect("comment should succeed");

    let rated = deployment
        .lifecycle
        .rate(
            &deployment.lead,
            RateTaskRequest::new(task_id, 5).with_comment("clean handoff"),
        )
        .await
        .expect("rating should succeed");
    assert!((rated.value().rating() - 5.0).abs() < f64::EPSILON);

    let details = deployment
        .lifecycle
        .task_details(task_id)
        .await
        .expect("details should resolve");
    assert!(details.is_rated());
    assert_eq!(details.rating_comments().len(), 1);

    let report = deployment
        .listing
        .grouped(&deployment.lead, &TaskListQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(report.total(), 1);
    let group = report.groups.first().expect("one group");
    assert_eq!(group.counts.completed, 1);

    let actions: Vec<AuditAction> = deployment
        .audit
        .entries()
        .expect("audit entries")
        .iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::TaskAdded,
            AuditAction::TaskStatusUpdated,
            AuditAction::TaskStatusUpdated,
            AuditAction::TaskComment,
            AuditAction::RateTask,
        ]
    );
}
