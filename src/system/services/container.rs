//! The project/system container.
//!
//! [`TaskManSystem`] owns every project (and through them every task), the
//! registered users, and the logical clock. Read access is public; mutation
//! is crate-private and reached through [`crate::command::domain::Command`]
//! so that every change is eligible for undo and redo.

use crate::system::config::SystemConfig;
use crate::system::domain::{
    Project, ProjectSnapshot, ProjectStatus, SystemError, SystemResult, SystemSnapshot,
    SystemState, TaskSnapshot, UserSnapshot,
};
use crate::task::domain::{
    Assignment, ProjectName, Reassignment, ReplacementSpec, Role, Task, TaskDomainError, TaskRef,
    TaskSpec, TaskStatus, Time, User, Username,
};
use std::collections::BTreeMap;
use tracing::info;

/// Container for projects, users and the logical clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskManSystem {
    projects: Vec<Project>,
    users: BTreeMap<Username, User>,
    clock: Time,
}

impl Default for TaskManSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManSystem {
    /// Creates an empty system with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SystemConfig::default())
    }

    /// Creates an empty system from configuration.
    #[must_use]
    pub const fn with_config(config: &SystemConfig) -> Self {
        Self {
            projects: Vec::new(),
            users: BTreeMap::new(),
            clock: config.start_time,
        }
    }

    /// Rebuilds a system from state supplied by the persistence collaborator.
    #[must_use]
    pub fn from_state(state: SystemState) -> Self {
        Self {
            projects: state.projects,
            users: state
                .users
                .into_iter()
                .map(|user| (user.name().clone(), user))
                .collect(),
            clock: state.clock,
        }
    }

    /// Exports the complete state for persistence.
    #[must_use]
    pub fn to_state(&self) -> SystemState {
        SystemState {
            clock: self.clock,
            projects: self.projects.clone(),
            users: self.users.values().cloned().collect(),
        }
    }

    /// Returns the current logical time.
    #[must_use]
    pub const fn clock(&self) -> Time {
        self.clock
    }

    /// Returns projects in creation order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Looks up a project by name.
    #[must_use]
    pub fn project(&self, name: &ProjectName) -> Option<&Project> {
        self.projects.iter().find(|project| project.name() == name)
    }

    /// Resolves a task reference.
    #[must_use]
    pub fn task(&self, task: &TaskRef) -> Option<&Task> {
        self.project(task.project())?.task(task.task())
    }

    /// Looks up a registered user.
    #[must_use]
    pub fn user(&self, name: &Username) -> Option<&User> {
        self.users.get(name)
    }

    /// Returns registered users ordered by name.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Captures a snapshot of the whole container.
    #[must_use]
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            clock: self.clock,
            projects: self
                .projects
                .iter()
                .map(|project| ProjectSnapshot::capture(project, self.clock))
                .collect(),
            users: self.users.values().map(UserSnapshot::from).collect(),
        }
    }

    /// Captures a snapshot of one project.
    #[must_use]
    pub fn project_snapshot(&self, name: &ProjectName) -> Option<ProjectSnapshot> {
        self.project(name)
            .map(|project| ProjectSnapshot::capture(project, self.clock))
    }

    /// Captures a snapshot of one task.
    #[must_use]
    pub fn task_snapshot(&self, task: &TaskRef) -> Option<TaskSnapshot> {
        self.task(task).map(TaskSnapshot::from)
    }

    /// Registers a user supplied by the session or loading collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::UsernameInUse`] when the name is taken.
    pub fn register_user(&mut self, user: User) -> SystemResult<()> {
        if self.users.contains_key(user.name()) {
            return Err(SystemError::UsernameInUse(user.name().clone()));
        }
        info!(user = %user.name(), "user registered");
        self.users.insert(user.name().clone(), user);
        Ok(())
    }

    pub(crate) fn require_project(&self, name: &ProjectName) -> SystemResult<&Project> {
        self.project(name)
            .ok_or_else(|| SystemError::ProjectNotFound(name.clone()))
    }

    pub(crate) fn require_task(&self, task: &TaskRef) -> SystemResult<&Task> {
        self.task(task)
            .ok_or_else(|| SystemError::TaskNotFound(task.clone()))
    }

    pub(crate) fn require_user(&self, name: &Username) -> SystemResult<&User> {
        self.user(name)
            .ok_or_else(|| SystemError::UserNotFound(name.clone()))
    }

    pub(crate) fn project_index(&self, name: &ProjectName) -> Option<usize> {
        self.projects
            .iter()
            .position(|project| project.name() == name)
    }

    pub(crate) fn project_mut(&mut self, name: &ProjectName) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|project| project.name() == name)
    }

    pub(crate) fn task_mut(&mut self, task: &TaskRef) -> Option<&mut Task> {
        self.project_mut(task.project())?.task_mut(task.task())
    }

    pub(crate) fn require_task_mut(&mut self, task: &TaskRef) -> SystemResult<&mut Task> {
        self.task_mut(task)
            .ok_or_else(|| SystemError::TaskNotFound(task.clone()))
    }

    pub(crate) fn insert_project(&mut self, index: usize, project: Project) {
        let at = index.min(self.projects.len());
        self.projects.insert(at, project);
    }

    pub(crate) fn take_project(&mut self, name: &ProjectName) -> SystemResult<(usize, Project)> {
        let index = self
            .project_index(name)
            .ok_or_else(|| SystemError::ProjectNotFound(name.clone()))?;
        Ok((index, self.projects.remove(index)))
    }

    pub(crate) const fn users_mut(&mut self) -> &mut BTreeMap<Username, User> {
        &mut self.users
    }

    pub(crate) fn put_user(&mut self, user: User) {
        self.users.insert(user.name().clone(), user);
    }

    /// Clears every user assignment matching `predicate`.
    pub(crate) fn release_users(&mut self, predicate: impl Fn(&Assignment) -> bool) {
        for user in self.users.values_mut() {
            if user.assignment().is_some_and(&predicate) {
                user.set_assignment(None);
            }
        }
    }

    pub(crate) fn refresh_project_status(&mut self, name: &ProjectName) {
        if let Some(project) = self.project_mut(name) {
            if project.refresh_status() {
                info!(project = %name, status = %project.status(), "project status changed");
            }
        }
    }

    /// Creates an empty project at the current logical time.
    pub(crate) fn create_project(
        &mut self,
        name: ProjectName,
        description: &str,
        due_time: Time,
    ) -> SystemResult<()> {
        if self.project(&name).is_some() {
            return Err(SystemError::ProjectNameInUse(name));
        }
        let project = Project::new(name, description, self.clock, due_time)?;
        info!(project = %project.name(), due = %due_time, "project created");
        self.projects.push(project);
        Ok(())
    }

    /// Deletes a project, cutting every edge that crosses into it.
    pub(crate) fn delete_project(&mut self, name: &ProjectName) -> SystemResult<()> {
        let (_, project) = self.take_project(name)?;
        let mut external_successors = Vec::new();
        for task in project.tasks() {
            let reference = task.reference();
            for previous in task.previous().iter().filter(|p| p.project() != name) {
                if let Some(predecessor) = self.task_mut(previous) {
                    predecessor.remove_next(&reference);
                }
            }
            for next in task.next().iter().filter(|n| n.project() != name) {
                if let Some(successor) = self.task_mut(next) {
                    successor.remove_previous(&reference);
                }
                external_successors.push(next.clone());
            }
        }
        self.release_users(|assignment| assignment.task.project() == name);
        for successor in &external_successors {
            self.refresh_availability(successor);
        }
        info!(project = %name, "project deleted");
        Ok(())
    }

    /// Adds a task to an ongoing project and wires its dependency edges.
    ///
    /// Every check runs before the first mutation, so a rejected task leaves
    /// no partial edges behind.
    pub(crate) fn add_task(&mut self, project_name: &ProjectName, spec: TaskSpec) -> SystemResult<()> {
        let project = self.require_project(project_name)?;
        if project.status() != ProjectStatus::Ongoing {
            return Err(SystemError::ProjectNotOngoing(project_name.clone()));
        }
        let reference = TaskRef::new(project_name.clone(), spec.name.clone());
        if project.task(&spec.name).is_some() {
            return Err(SystemError::TaskNameInUse(reference));
        }
        spec.validate()?;
        self.check_new_edges(&reference, &spec.previous, &spec.next)?;

        let satisfied = spec
            .previous
            .iter()
            .all(|previous| self.is_satisfied(previous));
        let task = Task::new(project_name.clone(), spec, satisfied)?;
        info!(task = %reference, status = %task.status(), "task created");
        self.attach(task, usize::MAX);
        Ok(())
    }

    /// Deletes a task, cutting its edges and replacement links.
    ///
    /// A replacement cannot be deleted once successors of the task it
    /// replaces have started.
    pub(crate) fn delete_task(&mut self, task: &TaskRef) -> SystemResult<()> {
        self.require_task(task)?;
        self.check_stand_in_removal(task)?;
        self.detach(task)?;
        info!(task = %task, "task deleted");
        Ok(())
    }

    /// Creates a replacement for a failed task in the same project.
    ///
    /// The replacement requires the same roles, has no predecessors of its
    /// own, and satisfies the failed task's successors once it finishes.
    pub(crate) fn replace_task(
        &mut self,
        failed: &TaskRef,
        replacement: ReplacementSpec,
    ) -> SystemResult<()> {
        let failed_task = self.require_task(failed)?;
        if failed_task.status() != TaskStatus::Failed {
            return Err(TaskDomainError::IncorrectTaskStatus {
                task: failed.clone(),
                status: failed_task.status(),
            }
            .into());
        }
        if failed_task.replacement().is_some() {
            return Err(SystemError::AlreadyReplaced(failed.clone()));
        }
        let reference = TaskRef::new(failed.project().clone(), replacement.name.clone());
        if self.task(&reference).is_some() {
            return Err(SystemError::TaskNameInUse(reference));
        }

        let spec = replacement.into_spec(failed_task.required_roles().to_vec());
        let mut task = Task::new(failed.project().clone(), spec, true)?;
        task.set_replaces(Some(failed.clone()));
        info!(task = %reference, replaces = %failed, "replacement task created");
        self.attach(task, usize::MAX);
        Ok(())
    }

    /// Assigns `username` to an open `role` slot on `task`.
    ///
    /// A pending assignment the user already holds elsewhere is released
    /// first; an executing one blocks the assignment.
    pub(crate) fn assign_user(
        &mut self,
        task: &TaskRef,
        username: &Username,
        role: Role,
    ) -> SystemResult<()> {
        let user = self.require_user(username)?;
        if !user.has_role(role) {
            return Err(SystemError::UserLacksRole {
                user: username.clone(),
                role,
            });
        }
        let current_status = user
            .assignment()
            .and_then(|current| self.task(&current.task))
            .map(Task::status);
        let plan = user.prepare_reassignment(task, current_status)?;
        let mut updated = self.require_task(task)?.clone();
        updated.assign(username.clone(), role, self.clock)?;

        if let Reassignment::Release(previous) = &plan {
            if let Some(previous_task) = self.task_mut(&previous.task) {
                previous_task.unassign(username)?;
            }
            info!(user = %username, task = %previous.task, "pending assignment released");
        }
        let status = updated.status();
        if let Some(target) = self.task_mut(task) {
            *target = updated;
        }
        if let Some(user_mut) = self.users.get_mut(username) {
            user_mut.set_assignment(Some(Assignment {
                task: task.clone(),
                role,
            }));
        }
        info!(user = %username, task = %task, role = %role, status = %status, "user assigned");
        Ok(())
    }

    /// Removes `username` from a pending task and returns the released role.
    pub(crate) fn unassign_user(&mut self, task: &TaskRef, username: &Username) -> SystemResult<Role> {
        self.require_user(username)?;
        let role = self.require_task_mut(task)?.unassign(username)?;
        if let Some(user) = self.users.get_mut(username) {
            if user.assignment().is_some_and(|current| &current.task == task) {
                user.set_assignment(None);
            }
        }
        info!(user = %username, task = %task, "user unassigned");
        Ok(role)
    }

    /// Finishes an executing task and makes waiting successors available.
    pub(crate) fn finish_task(&mut self, task: &TaskRef) -> SystemResult<()> {
        let now = self.clock;
        self.require_task_mut(task)?.finish(now)?;
        info!(task = %task, end = %now, "task finished");
        self.propagate_from(task);
        self.refresh_project_status(task.project());
        Ok(())
    }

    /// Fails an executing task.
    pub(crate) fn fail_task(&mut self, task: &TaskRef) -> SystemResult<()> {
        let now = self.clock;
        self.require_task_mut(task)?.fail(now)?;
        info!(task = %task, end = %now, "task failed");
        self.refresh_project_status(task.project());
        Ok(())
    }

    /// Moves the logical clock forward by `minutes`.
    pub(crate) fn advance_time(&mut self, minutes: i64) -> SystemResult<Time> {
        let delta = u64::try_from(minutes).map_err(|_| SystemError::TimeMovesBackwards(minutes))?;
        let next = self
            .clock
            .checked_add_minutes(delta)
            .ok_or(SystemError::TimeOverflow(minutes))?;
        self.clock = next;
        info!(clock = %next, "time advanced");
        Ok(next)
    }

    /// Inserts `task` into its project at `index` and wires the other side of
    /// every edge and replacement link it declares.
    pub(crate) fn attach(&mut self, task: Task, index: usize) {
        let reference = task.reference();
        let previous: Vec<TaskRef> = task.previous().iter().cloned().collect();
        let next: Vec<TaskRef> = task.next().iter().cloned().collect();
        let replaces = task.replaces().cloned();
        let replacement = task.replacement().cloned();

        if let Some(project) = self.project_mut(task.project()) {
            project.insert_task(index, task);
        }
        for predecessor in &previous {
            if let Some(other) = self.task_mut(predecessor) {
                other.insert_next(reference.clone());
            }
        }
        for successor in &next {
            if let Some(other) = self.task_mut(successor) {
                other.insert_previous(reference.clone());
            }
        }
        if let Some(failed) = &replaces {
            if let Some(other) = self.task_mut(failed) {
                other.set_replacement(Some(reference.clone()));
            }
        }
        if let Some(stand_in) = &replacement {
            if let Some(other) = self.task_mut(stand_in) {
                other.set_replaces(Some(reference.clone()));
            }
        }
        self.propagate_from(&reference);
    }

    /// Removes a task from its project, cutting the other side of every edge
    /// and link, releasing its users, and returning its position and value.
    pub(crate) fn detach(&mut self, task: &TaskRef) -> SystemResult<(usize, Task)> {
        let project = self
            .project_mut(task.project())
            .ok_or_else(|| SystemError::ProjectNotFound(task.project().clone()))?;
        let index = project
            .position(task.task())
            .ok_or_else(|| SystemError::TaskNotFound(task.clone()))?;
        let removed = project
            .remove_task(task.task())
            .ok_or_else(|| SystemError::TaskNotFound(task.clone()))?;

        for predecessor in removed.previous() {
            if let Some(other) = self.task_mut(predecessor) {
                other.remove_next(task);
            }
        }
        for successor in removed.next() {
            if let Some(other) = self.task_mut(successor) {
                other.remove_previous(task);
            }
        }
        if let Some(failed) = removed.replaces() {
            if let Some(other) = self.task_mut(failed) {
                other.set_replacement(None);
            }
        }
        if let Some(stand_in) = removed.replacement() {
            if let Some(other) = self.task_mut(stand_in) {
                other.set_replaces(None);
            }
        }
        self.release_users(|assignment| &assignment.task == task);

        for successor in removed.next() {
            self.refresh_availability(successor);
        }
        if let Some(failed) = removed.replaces() {
            self.propagate_from(failed);
        }
        Ok((index, removed))
    }
}
