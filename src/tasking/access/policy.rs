//! Authorization decision functions.

use crate::tasking::domain::{
    Project, ProjectId, Role, RolePriorityTable, Task, TaskId, UnknownRoleError, UserId,
};
use thiserror::Error;

/// Trusted identity attached to every request after upstream
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    /// The acting user.
    pub id: UserId,
    /// The acting user's role.
    pub role: Role,
    /// Projects the actor has been granted access to.
    pub accessible_projects: Vec<ProjectId>,
}

impl ActorContext {
    /// Creates an actor context with no project grants.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            accessible_projects: Vec::new(),
        }
    }

    /// Sets the actor's accessible-project grants.
    #[must_use]
    pub fn with_accessible_projects(mut self, projects: Vec<ProjectId>) -> Self {
        self.accessible_projects = projects;
        self
    }

    /// Returns whether the actor holds the unrestricted role.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin)
    }

    /// Returns whether the actor holds administrative authority.
    #[must_use]
    pub const fn has_admin_authority(&self) -> bool {
        matches!(self.role, Role::Admin | Role::SuperAdmin)
    }

    /// Returns whether the given project is in the actor's grant set.
    #[must_use]
    pub fn can_access_project(&self, project: ProjectId) -> bool {
        self.accessible_projects.contains(&project)
    }
}

/// Reason an authorization decision denied the request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessDenial {
    /// A role was missing from the configured priority table.
    #[error("role {0} is not configured; denying by default")]
    UnknownRole(Role),

    /// A referenced user could not be resolved.
    #[error("user {user} could not be resolved; denying by default")]
    PrincipalNotFound {
        /// The unresolved user.
        user: UserId,
    },

    /// The actor is neither a member nor a manager of the project.
    #[error("you are not assigned to project {project}")]
    NotProjectMember {
        /// The project the actor tried to touch.
        project: ProjectId,
    },

    /// A requested lead does not manage the project.
    #[error("user {lead} does not manage project {project} and cannot lead its tasks")]
    LeadNotProjectManager {
        /// The rejected lead.
        lead: UserId,
        /// The project in question.
        project: ProjectId,
    },

    /// A user cannot lead a task they are assigned to.
    #[error("user {user} cannot be both lead and assignee of the same task")]
    SelfLeadAssignment {
        /// The user appearing on both sides.
        user: UserId,
    },

    /// The assignee outranks the acting user.
    #[error("an actor with role {actor} cannot assign tasks to a {assignee}")]
    AssigneeOutranksActor {
        /// Acting role.
        actor: Role,
        /// Assignee role.
        assignee: Role,
    },

    /// The assignee outranks the requested lead.
    #[error("a {lead} lead cannot oversee a task assigned to a {assignee}")]
    AssigneeOutranksLead {
        /// Lead role.
        lead: Role,
        /// Assignee role.
        assignee: Role,
    },

    /// The task creator outranks the acting user.
    #[error("an actor with role {actor} cannot modify a task created by a {creator}")]
    CreatorOutranksActor {
        /// Acting role.
        actor: Role,
        /// Creator role.
        creator: Role,
    },

    /// Rated tasks are closed for edits by junior roles.
    #[error("a {role} may not edit a task once it has been rated")]
    RatedTaskEditRestricted {
        /// Acting role.
        role: Role,
    },

    /// The actor is not part of the task.
    #[error("you are not the creator, assignee, or lead of task {task}")]
    NotTaskParticipant {
        /// The task in question.
        task: TaskId,
    },

    /// The task's project is outside the actor's grants.
    #[error("the project of this task ({project}) is not assigned to you")]
    ProjectNotAccessible {
        /// The inaccessible project.
        project: ProjectId,
    },

    /// Assignees may not rate their own work.
    #[error("the assignee of task {task} cannot rate it")]
    AssigneeRatesOwnTask {
        /// The task in question.
        task: TaskId,
    },

    /// Rating requires a seat in the task's lead set.
    #[error("only a lead of task {task} may rate it")]
    NotTaskLead {
        /// The task in question.
        task: TaskId,
    },
}

/// Relationship facts for assigning a lead/assignee pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentFacts {
    /// Role of the acting user.
    pub actor_role: Role,
    /// The requested lead.
    pub lead: UserId,
    /// Role of the requested lead.
    pub lead_role: Role,
    /// The requested assignee.
    pub assignee: UserId,
    /// Role of the requested assignee.
    pub assignee_role: Role,
}

/// Pure authorization engine over the configured role ranking.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy<'a> {
    roles: &'a RolePriorityTable,
}

impl<'a> AccessPolicy<'a> {
    /// Creates a policy bound to a role priority table.
    #[must_use]
    pub const fn new(roles: &'a RolePriorityTable) -> Self {
        Self { roles }
    }

    fn rank(&self, role: Role) -> Result<u8, AccessDenial> {
        self.roles
            .priority_of(role)
            .map_err(|UnknownRoleError(unranked)| AccessDenial::UnknownRole(unranked))
    }

    /// Decides whether the actor may create a task in the project.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] when the actor is not a member of the
    /// project, or when any requested lead does not manage it.
    pub fn authorize_create(
        &self,
        actor: &ActorContext,
        project: &Project,
        leads: &[UserId],
    ) -> Result<(), AccessDenial> {
        if !actor.is_super_admin() && !project.is_member(actor.id) {
            return Err(AccessDenial::NotProjectMember {
                project: project.id,
            });
        }
        for lead in leads {
            if !project.is_managed_by(*lead) {
                return Err(AccessDenial::LeadNotProjectManager {
                    lead: *lead,
                    project: project.id,
                });
            }
        }
        Ok(())
    }

    /// Decides whether the lead/assignee pairing is permitted.
    ///
    /// A lead or assignee must never outrank the person assigning them,
    /// and a user cannot lead a task assigned to themselves.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] naming the violated seniority rule.
    pub fn authorize_lead_and_assignee(
        &self,
        facts: &AssignmentFacts,
    ) -> Result<(), AccessDenial> {
        if facts.lead == facts.assignee {
            return Err(AccessDenial::SelfLeadAssignment { user: facts.lead });
        }
        let actor_rank = self.rank(facts.actor_role)?;
        let lead_rank = self.rank(facts.lead_role)?;
        let assignee_rank = self.rank(facts.assignee_role)?;

        if actor_rank < assignee_rank {
            return Err(AccessDenial::AssigneeOutranksActor {
                actor: facts.actor_role,
                assignee: facts.assignee_role,
            });
        }
        if lead_rank < assignee_rank {
            return Err(AccessDenial::AssigneeOutranksLead {
                lead: facts.lead_role,
                assignee: facts.assignee_role,
            });
        }
        Ok(())
    }

    /// Decides whether the actor may edit the task.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] when the project is outside the actor's
    /// grants, the task is rated and the actor too junior, or the creator
    /// outranks the actor.
    pub fn authorize_edit(
        &self,
        actor: &ActorContext,
        task: &Task,
        creator_role: Role,
    ) -> Result<(), AccessDenial> {
        if actor.is_super_admin() {
            return Ok(());
        }
        if !actor.can_access_project(task.project()) {
            return Err(AccessDenial::ProjectNotAccessible {
                project: task.project(),
            });
        }
        if task.is_rated() && matches!(actor.role, Role::Contributor | Role::Intern) {
            return Err(AccessDenial::RatedTaskEditRestricted { role: actor.role });
        }
        if self.rank(actor.role)? < self.rank(creator_role)? {
            return Err(AccessDenial::CreatorOutranksActor {
                actor: actor.role,
                creator: creator_role,
            });
        }
        Ok(())
    }

    /// Decides whether the actor may change the task's status.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] when the actor is not a participant of the
    /// task or the assignee outranks the actor.
    pub fn authorize_status_update(
        &self,
        actor: &ActorContext,
        task: &Task,
        assignee_role: Role,
    ) -> Result<(), AccessDenial> {
        if actor.is_super_admin() {
            return Ok(());
        }
        if !task.is_participant(actor.id) {
            return Err(AccessDenial::NotTaskParticipant { task: task.id() });
        }
        if self.rank(actor.role)? < self.rank(assignee_role)? {
            return Err(AccessDenial::AssigneeOutranksActor {
                actor: actor.role,
                assignee: assignee_role,
            });
        }
        Ok(())
    }

    /// Decides whether the actor may delete the task.
    ///
    /// Creators may always delete their own tasks; anyone else needs
    /// strictly greater seniority than the creator.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] when the project is outside the actor's
    /// grants or the seniority requirement is not met.
    pub fn authorize_delete(
        &self,
        actor: &ActorContext,
        task: &Task,
        creator_role: Role,
    ) -> Result<(), AccessDenial> {
        if actor.is_super_admin() {
            return Ok(());
        }
        if !actor.can_access_project(task.project()) {
            return Err(AccessDenial::ProjectNotAccessible {
                project: task.project(),
            });
        }
        if task.created_by() == actor.id {
            return Ok(());
        }
        if self.rank(actor.role)? <= self.rank(creator_role)? {
            return Err(AccessDenial::CreatorOutranksActor {
                actor: actor.role,
                creator: creator_role,
            });
        }
        Ok(())
    }

    /// Decides whether the actor may rate the task.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial`] when the actor is the assignee, is not in
    /// the lead set, or lacks access to the task's project.
    pub fn authorize_rate(&self, actor: &ActorContext, task: &Task) -> Result<(), AccessDenial> {
        if actor.has_admin_authority() {
            return Ok(());
        }
        if task.assigned_to() == Some(actor.id) {
            return Err(AccessDenial::AssigneeRatesOwnTask { task: task.id() });
        }
        if !task.has_lead(actor.id) {
            return Err(AccessDenial::NotTaskLead { task: task.id() });
        }
        if !actor.can_access_project(task.project()) {
            return Err(AccessDenial::ProjectNotAccessible {
                project: task.project(),
            });
        }
        Ok(())
    }
}
