//! The closed set of state-changing operations.
//!
//! Every mutation of a [`TaskManSystem`] is expressed as a [`Command`]
//! variant. Commands hold only their arguments and are never changed once
//! built. Applying one returns a [`Reversal`] holding whatever it needs to
//! undo itself, which the command log keeps beside it.

use crate::system::domain::{Project, SystemError, SystemResult};
use crate::system::services::TaskManSystem;
use crate::task::domain::{
    Assignment, ProjectName, ReplacementSpec, Role, Task, TaskRef, TaskSpec, Time, User, Username,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::error;

/// What an applied command needs, beyond its arguments, to undo itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reversal {
    /// The arguments suffice.
    Arguments,
    /// A deleted project.
    Project(ProjectRemoval),
    /// A deleted task.
    Task(TaskRemoval),
    /// The assignment an assigned user held before.
    Assignment(PriorAssignment),
    /// The slot an unassigned user vacated.
    Role(ReleasedRole),
}

impl Reversal {
    const fn project(&self) -> Option<&ProjectRemoval> {
        match self {
            Self::Project(state) => Some(state),
            _ => None,
        }
    }

    const fn task(&self) -> Option<&TaskRemoval> {
        match self {
            Self::Task(state) => Some(state),
            _ => None,
        }
    }

    const fn assignment(&self) -> Option<&PriorAssignment> {
        match self {
            Self::Assignment(state) => Some(state),
            _ => None,
        }
    }

    const fn role(&self) -> Option<&ReleasedRole> {
        match self {
            Self::Role(state) => Some(state),
            _ => None,
        }
    }
}

/// State a project deletion needs to restore the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectRemoval {
    index: usize,
    project: Project,
    users: Vec<User>,
}

impl ProjectRemoval {
    fn capture(system: &TaskManSystem, name: &ProjectName) -> SystemResult<Self> {
        let index = system
            .project_index(name)
            .ok_or_else(|| SystemError::ProjectNotFound(name.clone()))?;
        let project = system.require_project(name)?.clone();
        let users = system
            .users()
            .filter(|user| {
                user.assignment()
                    .is_some_and(|assignment| assignment.task.project() == name)
            })
            .cloned()
            .collect();
        Ok(Self {
            index,
            project,
            users,
        })
    }
}

/// State a task deletion needs to restore the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskRemoval {
    index: usize,
    task: Task,
    users: Vec<User>,
}

impl TaskRemoval {
    fn capture(system: &TaskManSystem, reference: &TaskRef) -> SystemResult<Self> {
        let index = system
            .require_project(reference.project())?
            .position(reference.task())
            .ok_or_else(|| SystemError::TaskNotFound(reference.clone()))?;
        let task = system.require_task(reference)?.clone();
        let users = system
            .users()
            .filter(|user| {
                user.assignment()
                    .is_some_and(|assignment| &assignment.task == reference)
            })
            .cloned()
            .collect();
        Ok(Self { index, task, users })
    }
}

/// The assignment a user held before being assigned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PriorAssignment(Option<Assignment>);

impl PriorAssignment {
    const fn assignment(&self) -> Option<&Assignment> {
        self.0.as_ref()
    }
}

/// The role slot a user vacated when unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReleasedRole(Role);

impl ReleasedRole {
    const fn role(self) -> Role {
        self.0
    }
}

/// A state-changing operation on the system.
///
/// Construct commands with the associated functions and hand them to a
/// [`crate::command::services::CommandManager`].
///
/// # Examples
///
/// ```
/// use taskman::command::domain::Command;
/// use taskman::task::domain::{ProjectName, Time};
///
/// let name = ProjectName::new("Omer").expect("valid name");
/// let command = Command::create_project(name, "Brewery", Time::from_minutes(2000));
/// assert_eq!(command.name(), "create_project");
/// assert!(command.is_reversible());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Creates an empty project.
    CreateProject {
        /// Project name.
        name: ProjectName,
        /// Free-form description.
        description: String,
        /// Due time.
        due_time: Time,
    },
    /// Deletes a project and every task it owns.
    DeleteProject {
        /// Project name.
        name: ProjectName,
    },
    /// Adds a task to a project.
    CreateTask {
        /// Owning project.
        project: ProjectName,
        /// Task definition.
        spec: TaskSpec,
    },
    /// Deletes a task.
    DeleteTask {
        /// Task to delete.
        task: TaskRef,
    },
    /// Creates a replacement for a failed task.
    ReplaceTask {
        /// The failed task.
        failed: TaskRef,
        /// Definition of the replacement.
        replacement: ReplacementSpec,
    },
    /// Adds the dependency edge `from -> to`.
    AddDependency {
        /// Predecessor.
        from: TaskRef,
        /// Successor.
        to: TaskRef,
    },
    /// Removes the dependency edge `from -> to`.
    RemoveDependency {
        /// Predecessor.
        from: TaskRef,
        /// Successor.
        to: TaskRef,
    },
    /// Assigns a user to a role slot of a task.
    AssignUser {
        /// Target task.
        task: TaskRef,
        /// Assigned user.
        user: Username,
        /// Role slot to fill.
        role: Role,
    },
    /// Removes a user from a pending task.
    UnassignUser {
        /// Target task.
        task: TaskRef,
        /// User to remove.
        user: Username,
    },
    /// Finishes an executing task.
    FinishTask {
        /// Target task.
        task: TaskRef,
    },
    /// Fails an executing task.
    FailTask {
        /// Target task.
        task: TaskRef,
    },
    /// Moves the logical clock forward. Cannot be undone.
    AdvanceTime {
        /// Minutes to advance by.
        minutes: i64,
    },
}

impl Command {
    /// Creates a [`Command::CreateProject`].
    #[must_use]
    pub fn create_project(name: ProjectName, description: impl Into<String>, due_time: Time) -> Self {
        Self::CreateProject {
            name,
            description: description.into(),
            due_time,
        }
    }

    /// Creates a [`Command::DeleteProject`].
    #[must_use]
    pub const fn delete_project(name: ProjectName) -> Self {
        Self::DeleteProject { name }
    }

    /// Creates a [`Command::CreateTask`].
    #[must_use]
    pub const fn create_task(project: ProjectName, spec: TaskSpec) -> Self {
        Self::CreateTask { project, spec }
    }

    /// Creates a [`Command::DeleteTask`].
    #[must_use]
    pub const fn delete_task(task: TaskRef) -> Self {
        Self::DeleteTask { task }
    }

    /// Creates a [`Command::ReplaceTask`].
    #[must_use]
    pub const fn replace_task(failed: TaskRef, replacement: ReplacementSpec) -> Self {
        Self::ReplaceTask {
            failed,
            replacement,
        }
    }

    /// Creates a [`Command::AddDependency`].
    #[must_use]
    pub const fn add_dependency(from: TaskRef, to: TaskRef) -> Self {
        Self::AddDependency { from, to }
    }

    /// Creates a [`Command::RemoveDependency`].
    #[must_use]
    pub const fn remove_dependency(from: TaskRef, to: TaskRef) -> Self {
        Self::RemoveDependency { from, to }
    }

    /// Creates a [`Command::AssignUser`].
    #[must_use]
    pub const fn assign_user(task: TaskRef, user: Username, role: Role) -> Self {
        Self::AssignUser { task, user, role }
    }

    /// Creates a [`Command::UnassignUser`].
    #[must_use]
    pub const fn unassign_user(task: TaskRef, user: Username) -> Self {
        Self::UnassignUser { task, user }
    }

    /// Creates a [`Command::FinishTask`].
    #[must_use]
    pub const fn finish_task(task: TaskRef) -> Self {
        Self::FinishTask { task }
    }

    /// Creates a [`Command::FailTask`].
    #[must_use]
    pub const fn fail_task(task: TaskRef) -> Self {
        Self::FailTask { task }
    }

    /// Creates a [`Command::AdvanceTime`].
    #[must_use]
    pub const fn advance_time(minutes: i64) -> Self {
        Self::AdvanceTime { minutes }
    }

    /// Returns the operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateProject { .. } => "create_project",
            Self::DeleteProject { .. } => "delete_project",
            Self::CreateTask { .. } => "create_task",
            Self::DeleteTask { .. } => "delete_task",
            Self::ReplaceTask { .. } => "replace_task",
            Self::AddDependency { .. } => "add_dependency",
            Self::RemoveDependency { .. } => "remove_dependency",
            Self::AssignUser { .. } => "assign_user",
            Self::UnassignUser { .. } => "unassign_user",
            Self::FinishTask { .. } => "finish_task",
            Self::FailTask { .. } => "fail_task",
            Self::AdvanceTime { .. } => "advance_time",
        }
    }

    /// Returns whether the command can be undone.
    #[must_use]
    pub const fn is_reversible(&self) -> bool {
        !matches!(self, Self::AdvanceTime { .. })
    }

    /// Returns the command's arguments keyed by parameter name.
    #[must_use]
    pub fn arguments(&self) -> BTreeMap<&'static str, String> {
        let mut arguments = BTreeMap::new();
        match self {
            Self::CreateProject {
                name,
                description,
                due_time,
            } => {
                arguments.insert("name", name.to_string());
                arguments.insert("description", description.clone());
                arguments.insert("due_time", due_time.to_string());
            }
            Self::DeleteProject { name } => {
                arguments.insert("name", name.to_string());
            }
            Self::CreateTask { project, spec } => {
                arguments.insert("project", project.to_string());
                arguments.insert("name", spec.name.to_string());
                arguments.insert("duration", Time::from_minutes(spec.estimated_duration).to_string());
                arguments.insert("deviation", spec.deviation.to_string());
                arguments.insert("roles", join(&spec.required_roles));
                arguments.insert("previous", join(&spec.previous));
                arguments.insert("next", join(&spec.next));
            }
            Self::DeleteTask { task } | Self::FinishTask { task } | Self::FailTask { task } => {
                arguments.insert("task", task.to_string());
            }
            Self::ReplaceTask {
                failed,
                replacement,
            } => {
                arguments.insert("failed", failed.to_string());
                arguments.insert("replacement", replacement.name.to_string());
            }
            Self::AddDependency { from, to } | Self::RemoveDependency { from, to } => {
                arguments.insert("from", from.to_string());
                arguments.insert("to", to.to_string());
            }
            Self::AssignUser { task, user, role } => {
                arguments.insert("task", task.to_string());
                arguments.insert("user", user.to_string());
                arguments.insert("role", role.to_string());
            }
            Self::UnassignUser { task, user } => {
                arguments.insert("task", task.to_string());
                arguments.insert("user", user.to_string());
            }
            Self::AdvanceTime { minutes } => {
                arguments.insert("minutes", minutes.to_string());
            }
        }
        arguments
    }

    /// Performs the operation and returns what reversal will need.
    pub(crate) fn apply(&self, system: &mut TaskManSystem) -> SystemResult<Reversal> {
        match self {
            Self::CreateProject {
                name,
                description,
                due_time,
            } => system
                .create_project(name.clone(), description, *due_time)
                .map(|()| Reversal::Arguments),
            Self::DeleteProject { name } => {
                let captured = ProjectRemoval::capture(system, name)?;
                system.delete_project(name)?;
                Ok(Reversal::Project(captured))
            }
            Self::CreateTask { project, spec } => system
                .add_task(project, spec.clone())
                .map(|()| Reversal::Arguments),
            Self::DeleteTask { task } => {
                let captured = TaskRemoval::capture(system, task)?;
                system.delete_task(task)?;
                Ok(Reversal::Task(captured))
            }
            Self::ReplaceTask {
                failed,
                replacement,
            } => system
                .replace_task(failed, replacement.clone())
                .map(|()| Reversal::Arguments),
            Self::AddDependency { from, to } => system
                .add_dependency(from, to)
                .map(|()| Reversal::Arguments),
            Self::RemoveDependency { from, to } => system
                .remove_dependency(from, to)
                .map(|()| Reversal::Arguments),
            Self::AssignUser { task, user, role } => {
                let earlier = system.require_user(user)?.assignment().cloned();
                system.assign_user(task, user, *role)?;
                Ok(Reversal::Assignment(PriorAssignment(earlier)))
            }
            Self::UnassignUser { task, user } => {
                let role = system.unassign_user(task, user)?;
                Ok(Reversal::Role(ReleasedRole(role)))
            }
            Self::FinishTask { task } => system.finish_task(task).map(|()| Reversal::Arguments),
            Self::FailTask { task } => system.fail_task(task).map(|()| Reversal::Arguments),
            Self::AdvanceTime { minutes } => system
                .advance_time(*minutes)
                .map(|_| Reversal::Arguments),
        }
    }

    /// Undoes an applied command using the `reversal` its application
    /// returned.
    ///
    /// The system must be in the state the command's application left it
    /// in. A failure here means that guarantee was broken, which is not
    /// recoverable, so it panics after logging.
    pub(crate) fn reverse(&self, reversal: &Reversal, system: &mut TaskManSystem) {
        if let Err(err) = self.inverse(reversal, system) {
            invariant_violation(self, &err);
        }
    }

    fn inverse(&self, reversal: &Reversal, system: &mut TaskManSystem) -> SystemResult<()> {
        match self {
            Self::CreateProject { name, .. } => system.delete_project(name),
            Self::DeleteProject { .. } => {
                let state = captured(self, reversal.project());
                system.restore_project(state.index, state.project.clone(), &state.users)
            }
            Self::CreateTask { project, spec } => {
                system.delete_task(&TaskRef::new(project.clone(), spec.name.clone()))
            }
            Self::DeleteTask { .. } => {
                let state = captured(self, reversal.task());
                system.restore_task(state.index, state.task.clone(), &state.users)
            }
            Self::ReplaceTask {
                failed,
                replacement,
            } => system.delete_task(&TaskRef::new(
                failed.project().clone(),
                replacement.name.clone(),
            )),
            Self::AddDependency { from, to } => system.remove_dependency(from, to),
            Self::RemoveDependency { from, to } => system.restore_dependency(from, to),
            Self::AssignUser { task, user, .. } => {
                let earlier = captured(self, reversal.assignment());
                system.revoke_assignment(task, user, earlier.assignment())
            }
            Self::UnassignUser { task, user } => {
                let vacated = captured(self, reversal.role());
                system.assign_user(task, user, vacated.role())
            }
            Self::FinishTask { task } | Self::FailTask { task } => system.reopen_task(task),
            // Refused by the manager before dispatch.
            Self::AdvanceTime { .. } => Ok(()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for (index, (key, value)) in self.arguments().iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            write!(f, "{separator}{key}={value}")?;
        }
        Ok(())
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn captured<'a, T>(command: &Command, value: Option<&'a T>) -> &'a T {
    match value {
        Some(found) => found,
        None => {
            error!(command = %command.name(), "reversal state does not match the command");
            panic!("command {} was reversed with mismatched state", command.name());
        }
    }
}

#[cold]
fn invariant_violation(command: &Command, err: &SystemError) -> ! {
    error!(command = %command, error = %err, "reversal failed on an applied command");
    panic!("reversal of {command} failed: {err}");
}
