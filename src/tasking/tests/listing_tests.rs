//! Grouped listing, analytics, and report-view tests.

use chrono::Utc;

use super::fixtures::{hours_ago, tomorrow, world};
use crate::tasking::domain::{
    RatingScore, Section, SectionId, TaskGroupId, TaskGroupKey, TaskStatus, UserAccount, UserId,
};
use crate::tasking::services::{TaskListQuery, TaskServiceError};

#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_tasks_never_appear() {
    let world = world();
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;
    let mut deleted = world.task_data(Some(world.contributor.id));
    deleted.is_deleted = true;
    world.insert_task(deleted).await;

    let report = world
        .listing
        .grouped(&world.lead, &TaskListQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(report.total(), 1);

    let analytics = world
        .listing
        .project_status_analytics(&world.lead)
        .await
        .expect("analytics should succeed");
    let breakdown = analytics.get(&world.project).expect("project breakdown");
    assert_eq!(breakdown.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn grouping_by_status_buckets_and_counts() {
    let world = world();
    let mut ongoing = world.task_data(Some(world.contributor.id));
    ongoing.status = TaskStatus::Ongoing;
    world.insert_task(ongoing).await;
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;
    world
        .insert_task(world.task_data(Some(world.intern.id)))
        .await;

    let query = TaskListQuery {
        group_by: TaskGroupKey::Status,
        ..TaskListQuery::default()
    };
    let report = world
        .listing
        .grouped(&world.lead, &query)
        .await
        .expect("listing should succeed");

    assert_eq!(report.groups.len(), 2);
    let not_started = report
        .groups
        .iter()
        .find(|group| group.id == TaskGroupId::Status(TaskStatus::NotStarted))
        .expect("not-started group");
    assert_eq!(not_started.total, 2);
    assert_eq!(not_started.counts.not_started, 2);
    let ongoing_group = report
        .groups
        .iter()
        .find(|group| group.id == TaskGroupId::Status(TaskStatus::Ongoing))
        .expect("ongoing group");
    assert_eq!(ongoing_group.counts.ongoing, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn default_grouping_orders_tasks_by_due_date() {
    let world = world();
    let mut later_data = world.task_data(Some(world.contributor.id));
    later_data.due_date = Some(tomorrow() + chrono::Duration::days(3));
    let later = world.insert_task(later_data).await;
    let sooner = world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;

    let report = world
        .listing
        .grouped(&world.lead, &TaskListQuery::default())
        .await
        .expect("listing should succeed");

    assert_eq!(report.groups.len(), 1);
    let group = report.groups.first().expect("one bucket");
    assert_eq!(
        group.id,
        TaskGroupId::Bucket {
            project: world.project,
            section: world.section,
        }
    );
    let order: Vec<_> = group.tasks.iter().map(|task| task.id()).collect();
    assert_eq!(order, vec![sooner.id(), later.id()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_group_key_is_rejected() {
    let world = world();
    let mut config = (*world.config).clone();
    config.allowed_group_keys = vec![TaskGroupKey::Default];
    let listing = crate::tasking::services::TaskListingService::new(
        world.repository.clone(),
        world.directory.clone(),
        std::sync::Arc::new(config),
        std::sync::Arc::new(mockable::DefaultClock),
    );

    let query = TaskListQuery {
        group_by: TaskGroupKey::Status,
        ..TaskListQuery::default()
    };
    let result = listing.grouped(&world.lead, &query).await;
    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn only_mine_restricts_to_creator_or_assignee() {
    let world = world();
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;
    world
        .insert_task(world.task_data(Some(world.intern.id)))
        .await;

    let query = TaskListQuery {
        only_mine: true,
        ..TaskListQuery::default()
    };
    let report = world
        .listing
        .grouped(&world.contributor, &query)
        .await
        .expect("listing should succeed");
    assert_eq!(report.total(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleted_identities_hidden_from_non_admins() {
    let world = world();
    let ghost = UserId::new();
    world
        .directory
        .upsert_user(UserAccount {
            id: ghost,
            name: "ghost".to_owned(),
            role: crate::tasking::domain::Role::Contributor,
            is_deleted: true,
        })
        .expect("upsert");
    world.insert_task(world.task_data(Some(ghost))).await;
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;

    let lead_view = world
        .listing
        .grouped(&world.lead, &TaskListQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(lead_view.total(), 1);

    let admin_view = world
        .listing
        .grouped(&world.admin, &TaskListQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(admin_view.total(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn archived_sections_hide_their_tasks() {
    let world = world();
    let archived_section = SectionId::new();
    world
        .directory
        .upsert_section(Section {
            id: archived_section,
            project: world.project,
            name: "icebox".to_owned(),
            is_archived: true,
        })
        .expect("upsert");
    let mut frozen = world.task_data(Some(world.contributor.id));
    frozen.section = archived_section;
    world.insert_task(frozen).await;
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;

    let report = world
        .listing
        .grouped(&world.lead, &TaskListQuery::default())
        .await
        .expect("listing should succeed");
    assert_eq!(report.total(), 1);

    let query = TaskListQuery {
        include_archived: true,
        ..TaskListQuery::default()
    };
    let unfiltered = world
        .listing
        .grouped(&world.lead, &query)
        .await
        .expect("listing should succeed");
    assert_eq!(unfiltered.total(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn analytics_reports_percentages_with_overdue_share() {
    let world = world();
    let mut completed_late = world.completed_task_data(world.contributor.id, hours_ago(48));
    completed_late.completed_date = Some(Utc::now());
    world.insert_task(completed_late).await;
    let mut ongoing = world.task_data(Some(world.contributor.id));
    ongoing.status = TaskStatus::Ongoing;
    world.insert_task(ongoing).await;
    let mut on_hold = world.task_data(Some(world.contributor.id));
    on_hold.status = TaskStatus::OnHold;
    world.insert_task(on_hold).await;
    world
        .insert_task(world.task_data(Some(world.contributor.id)))
        .await;

    let analytics = world
        .listing
        .project_status_analytics(&world.lead)
        .await
        .expect("analytics should succeed");
    let breakdown = analytics.get(&world.project).expect("project breakdown");

    assert_eq!(breakdown.total, 4);
    assert!((breakdown.completed_pct - 25.0).abs() < f64::EPSILON);
    assert!((breakdown.ongoing_pct - 25.0).abs() < f64::EPSILON);
    assert!((breakdown.on_hold_pct - 25.0).abs() < f64::EPSILON);
    assert!((breakdown.not_started_pct - 25.0).abs() < f64::EPSILON);
    assert!((breakdown.overdue_pct - 25.0).abs() < f64::EPSILON);
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_rating_scopes_to_the_leads_tasks() {
    let world = world();
    world
        .insert_task(world.completed_task_data(world.contributor.id, hours_ago(2)))
        .await;
    let mut rated = world.completed_task_data(world.contributor.id, hours_ago(2));
    rated.rating = Some(RatingScore::new(5).expect("valid score"));
    rated.rated_by = Some(world.lead.id);
    world.insert_task(rated).await;
    let mut foreign_lead = world.completed_task_data(world.intern.id, hours_ago(2));
    foreign_lead.lead = vec![world.second_lead.id];
    world.insert_task(foreign_lead).await;

    let pending = world
        .listing
        .pending_rating(&world.lead, None)
        .await
        .expect("pending listing should succeed");

    assert_eq!(pending.len(), 1);
    let task = pending.first().expect("one pending task");
    assert!(!task.is_rated());
    assert!(task.has_lead(world.lead.id));
}

#[tokio::test(flavor = "multi_thread")]
async fn overdue_listing_skips_on_hold_and_completed() {
    let world = world();
    let mut overdue = world.task_data(Some(world.contributor.id));
    overdue.status = TaskStatus::Ongoing;
    overdue.due_date = Some(hours_ago(12));
    world.insert_task(overdue).await;
    let mut parked = world.task_data(Some(world.contributor.id));
    parked.status = TaskStatus::OnHold;
    parked.due_date = Some(hours_ago(12));
    world.insert_task(parked).await;
    world
        .insert_task(world.completed_task_data(world.contributor.id, hours_ago(12)))
        .await;

    let overdue_tasks = world
        .listing
        .overdue(&world.lead, None)
        .await
        .expect("overdue listing should succeed");

    assert_eq!(overdue_tasks.len(), 1);
    assert_eq!(
        overdue_tasks.first().map(|task| task.status()),
        Some(TaskStatus::Ongoing)
    );
}
