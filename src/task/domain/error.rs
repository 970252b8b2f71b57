//! Error types for task domain validation and parsing.

use super::{Role, TaskRef, TaskStatus, Username};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// A task was declared without any required role.
    #[error("a task must require at least one role")]
    EmptyRoleSet,

    /// A user was declared without any held role.
    #[error("user {0} must hold at least one role")]
    UserWithoutRoles(Username),

    /// Only developer roles can be required by a task.
    #[error("role {0} cannot be required by a task")]
    NonDeveloperRole(Role),

    /// The estimated duration must be positive.
    #[error("estimated duration must be a positive number of minutes")]
    ZeroDuration,

    /// The task is not in a status that allows the requested operation.
    #[error("incorrect task status for {task}: {status}")]
    IncorrectTaskStatus {
        /// Task on which the operation was attempted.
        task: TaskRef,
        /// Status the task held at the time.
        status: TaskStatus,
    },

    /// The task has no open slot for the requested role.
    #[error("task {task} has no open slot for role {role}")]
    NoOpenSlot {
        /// Task on which assignment was attempted.
        task: TaskRef,
        /// Requested role.
        role: Role,
    },

    /// The user already fills a slot on the task.
    #[error("user {user} is already assigned to task {task}")]
    UserAlreadyAssigned {
        /// Assigned user.
        user: Username,
        /// Task holding the assignment.
        task: TaskRef,
    },

    /// The user holds no slot on the task.
    #[error("user {user} is not assigned to task {task}")]
    UserNotAssigned {
        /// User that was expected to be assigned.
        user: Username,
        /// Task without the assignment.
        task: TaskRef,
    },

    /// The user is executing another task and cannot abandon it.
    #[error("user {user} is already executing task {task}")]
    UserAlreadyExecuting {
        /// Busy user.
        user: Username,
        /// Task currently being executed.
        task: TaskRef,
    },

    /// Completion would record an end time before the start time.
    #[error("task {0} cannot end before it started")]
    EndBeforeStart(TaskRef),
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
