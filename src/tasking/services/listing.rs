//! Grouped, filtered task listings and per-project analytics.

use super::{TaskServiceResult, ValidationError};
use crate::tasking::access::ActorContext;
use crate::tasking::config::TaskPolicyConfig;
use crate::tasking::domain::{
    ProjectId, ProjectStatusBreakdown, Role, SectionId, StatusCounts, Task, TaskGroupId,
    TaskGroupKey, TaskPriority, TaskStatus, UserId,
};
use crate::tasking::ports::{OrgDirectory, TaskFilter, TaskRepository, TaskSort};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Parameters of a grouped task listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Attribute to group by.
    pub group_by: TaskGroupKey,
    /// Restrict to these projects.
    pub projects: Option<Vec<ProjectId>>,
    /// Restrict to these sections.
    pub sections: Option<Vec<SectionId>>,
    /// Restrict to these assignees.
    pub assignees: Option<Vec<UserId>>,
    /// Restrict to tasks led by any of these users.
    pub leads: Option<Vec<UserId>>,
    /// Restrict to these creators.
    pub creators: Option<Vec<UserId>>,
    /// Restrict to these priorities.
    pub priorities: Option<Vec<TaskPriority>>,
    /// Restrict to these statuses.
    pub statuses: Option<Vec<TaskStatus>>,
    /// Restrict to due dates at or after this instant.
    pub due_from: Option<DateTime<Utc>>,
    /// Restrict to due dates at or before this instant.
    pub due_to: Option<DateTime<Utc>>,
    /// Restrict on the rated flag.
    pub is_rated: Option<bool>,
    /// Include tasks of archived projects and sections.
    pub include_archived: bool,
    /// Restrict to tasks the caller created or is assigned to.
    pub only_mine: bool,
    /// Sort instruction; defaults to due date ascending.
    pub sort: Option<TaskSort>,
}

/// One group of a grouped task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    /// Group identity.
    pub id: TaskGroupId,
    /// Tasks in the group, in listing order.
    pub tasks: Vec<Task>,
    /// Per-status counts.
    pub counts: StatusCounts,
    /// Total tasks in the group.
    pub total: usize,
}

/// A grouped task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedTaskReport {
    /// The grouping attribute that produced the report.
    pub group_by: TaskGroupKey,
    /// Groups ordered by their identity: project, then section, then the
    /// per-key natural order.
    pub groups: Vec<TaskGroup>,
}

impl GroupedTaskReport {
    /// Total tasks across all groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().map(|group| group.total).sum()
    }
}

/// Read-side service building grouped listings and analytics.
pub struct TaskListingService<C>
where
    C: Clock + Send + Sync,
{
    repository: Arc<dyn TaskRepository>,
    directory: Arc<dyn OrgDirectory>,
    config: Arc<TaskPolicyConfig>,
    clock: Arc<C>,
}

impl<C> TaskListingService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new listing service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        directory: Arc<dyn OrgDirectory>,
        config: Arc<TaskPolicyConfig>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            directory,
            config,
            clock,
        }
    }

    /// Builds a grouped, filtered, sorted task listing.
    ///
    /// Soft-deleted tasks never appear. Non-admin callers are scoped to
    /// their accessible projects and never see tasks whose assignee or
    /// creator account has been deleted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for group or sort keys outside the
    /// configured allow-lists, and dependency errors from the repository
    /// or directory.
    pub async fn grouped(
        &self,
        actor: &ActorContext,
        query: &TaskListQuery,
    ) -> TaskServiceResult<GroupedTaskReport> {
        if !self.config.allows_group_key(query.group_by) {
            return Err(ValidationError::UnsupportedGroupKey(query.group_by).into());
        }
        if let Some(sort) = query.sort
            && !self.config.allows_sort_key(sort.key)
        {
            return Err(ValidationError::UnsupportedSortKey(sort.key).into());
        }
        let sort = query.sort.unwrap_or_default();

        let mut filter = TaskFilter {
            projects: project_scope(actor, query.projects.clone()),
            sections: query.sections.clone(),
            statuses: query.statuses.clone(),
            priorities: query.priorities.clone(),
            assigned_to: query.assignees.clone(),
            created_by: query.creators.clone(),
            lead_any: query.leads.clone(),
            due_after: query.due_from,
            due_before: query.due_to,
            is_rated: query.is_rated,
            created_or_assigned: query.only_mine.then_some(actor.id),
            ..TaskFilter::default()
        };
        self.exclude_deleted_identities(actor, &mut filter).await?;

        let tasks = self.repository.find(&filter, Some(sort)).await?;
        let tasks = if query.include_archived {
            tasks
        } else {
            self.strip_archived(tasks).await?
        };

        let mut buckets: BTreeMap<TaskGroupId, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            let id = TaskGroupId::for_task(query.group_by, &task);
            buckets.entry(id).or_default().push(task);
        }

        let groups = buckets
            .into_iter()
            .map(|(id, tasks)| {
                let counts = StatusCounts::tally(&tasks);
                let total = tasks.len();
                TaskGroup {
                    id,
                    tasks,
                    counts,
                    total,
                }
            })
            .collect();
        Ok(GroupedTaskReport {
            group_by: query.group_by,
            groups,
        })
    }

    /// Per-project percentage breakdown of status counts and overdue
    /// completions.
    ///
    /// # Errors
    ///
    /// Returns dependency errors from the repository.
    pub async fn project_status_analytics(
        &self,
        actor: &ActorContext,
    ) -> TaskServiceResult<BTreeMap<ProjectId, ProjectStatusBreakdown>> {
        let filter = TaskFilter {
            projects: project_scope(actor, None),
            ..TaskFilter::default()
        };
        let tasks = self.repository.find(&filter, None).await?;

        let mut per_project: BTreeMap<ProjectId, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            per_project.entry(task.project()).or_default().push(task);
        }

        Ok(per_project
            .into_iter()
            .map(|(project, tasks)| {
                let counts = StatusCounts::tally(&tasks);
                let overdue = tasks.iter().filter(|task| task.completed_after_due()).count();
                (project, ProjectStatusBreakdown::from_counts(counts, overdue))
            })
            .collect())
    }

    /// Completed, unrated tasks awaiting a rating, scoped by role: juniors
    /// see their own, leads see tasks they lead.
    ///
    /// # Errors
    ///
    /// Returns dependency errors from the repository or directory.
    pub async fn pending_rating(
        &self,
        actor: &ActorContext,
        member: Option<UserId>,
    ) -> TaskServiceResult<Vec<Task>> {
        let mut filter = TaskFilter {
            statuses: Some(vec![TaskStatus::Completed]),
            is_rated: Some(false),
            projects: project_scope(actor, None),
            assigned_to: member.map(|user| vec![user]),
            ..TaskFilter::default()
        };
        match actor.role {
            Role::Contributor | Role::Intern => {
                filter.created_or_assigned = Some(actor.id);
            }
            Role::Lead => filter.lead_any = Some(vec![actor.id]),
            Role::Guest | Role::Admin | Role::SuperAdmin => {}
        }
        self.exclude_deleted_identities(actor, &mut filter).await?;

        Ok(self.repository.find(&filter, Some(TaskSort::default())).await?)
    }

    /// Tasks past their due date that are neither on hold nor completed.
    ///
    /// # Errors
    ///
    /// Returns dependency errors from the repository.
    pub async fn overdue(
        &self,
        actor: &ActorContext,
        assignee: Option<UserId>,
    ) -> TaskServiceResult<Vec<Task>> {
        let filter = TaskFilter {
            exclude_statuses: Some(vec![TaskStatus::OnHold, TaskStatus::Completed]),
            due_before: Some(self.clock.utc()),
            assigned_to: assignee.map(|user| vec![user]),
            projects: project_scope(actor, None),
            ..TaskFilter::default()
        };
        Ok(self.repository.find(&filter, Some(TaskSort::default())).await?)
    }

    /// Hides identities of deleted accounts from non-admin callers.
    async fn exclude_deleted_identities(
        &self,
        actor: &ActorContext,
        filter: &mut TaskFilter,
    ) -> TaskServiceResult<()> {
        if actor.has_admin_authority() {
            return Ok(());
        }
        let deleted = self.directory.list_deleted_users().await?;
        if !deleted.is_empty() {
            filter.assigned_not_in = Some(deleted.clone());
            filter.created_not_in = Some(deleted);
        }
        Ok(())
    }

    /// Drops tasks whose project or section is archived or gone.
    async fn strip_archived(&self, tasks: Vec<Task>) -> TaskServiceResult<Vec<Task>> {
        let mut live_projects: HashMap<ProjectId, bool> = HashMap::new();
        let mut live_sections: HashMap<SectionId, bool> = HashMap::new();
        let mut kept = Vec::with_capacity(tasks.len());

        for task in tasks {
            let project_live = match live_projects.get(&task.project()) {
                Some(flag) => *flag,
                None => {
                    let flag = self
                        .directory
                        .find_project(task.project())
                        .await?
                        .is_some_and(|project| !project.is_archived && !project.is_deleted);
                    live_projects.insert(task.project(), flag);
                    flag
                }
            };
            if !project_live {
                continue;
            }
            let section_live = match live_sections.get(&task.section()) {
                Some(flag) => *flag,
                None => {
                    // A section missing from the directory does not hide
                    // its tasks.
                    let flag = self
                        .directory
                        .find_section(task.section())
                        .await?
                        .is_none_or(|section| !section.is_archived);
                    live_sections.insert(task.section(), flag);
                    flag
                }
            };
            if section_live {
                kept.push(task);
            }
        }
        Ok(kept)
    }
}

/// Projects visible to the actor: super admins see everything; everyone
/// else is clipped to their grant set.
fn project_scope(
    actor: &ActorContext,
    requested: Option<Vec<ProjectId>>,
) -> Option<Vec<ProjectId>> {
    if actor.is_super_admin() {
        return requested;
    }
    match requested {
        None => Some(actor.accessible_projects.clone()),
        Some(projects) => Some(
            projects
                .into_iter()
                .filter(|project| actor.can_access_project(*project))
                .collect(),
        ),
    }
}
