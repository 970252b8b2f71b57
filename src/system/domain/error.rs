//! Error types for container-level validation and graph integrity.

use crate::task::domain::{ProjectName, Role, TaskDomainError, TaskRef, Time, Username};
use thiserror::Error;

/// Errors returned by container operations.
///
/// Every variant is recoverable and is reported before any state changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SystemError {
    /// A project with the same name already exists.
    #[error("project name already in use: {0}")]
    ProjectNameInUse(ProjectName),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectName),

    /// The project no longer accepts new tasks.
    #[error("project {0} is not ongoing")]
    ProjectNotOngoing(ProjectName),

    /// The due time precedes the time the project would be created at.
    #[error("due time {due} precedes creation time {creation}")]
    DueBeforeCreation {
        /// Requested due time.
        due: Time,
        /// Current logical time.
        creation: Time,
    },

    /// A task with the same name already exists in the project.
    #[error("task name already in use: {0}")]
    TaskNameInUse(TaskRef),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskRef),

    /// A user with the same name is already registered.
    #[error("username already in use: {0}")]
    UsernameInUse(Username),

    /// The user is not registered.
    #[error("user not found: {0}")]
    UserNotFound(Username),

    /// The user does not hold the requested role.
    #[error("user {user} does not hold role {role}")]
    UserLacksRole {
        /// Acting user.
        user: Username,
        /// Requested role.
        role: Role,
    },

    /// Adding the edge would close a cycle in the dependency graph.
    #[error("dependency {from} -> {to} would create a loop")]
    LoopDependency {
        /// Predecessor endpoint.
        from: TaskRef,
        /// Successor endpoint.
        to: TaskRef,
    },

    /// The edge already exists.
    #[error("dependency {from} -> {to} already exists")]
    DuplicateDependency {
        /// Predecessor endpoint.
        from: TaskRef,
        /// Successor endpoint.
        to: TaskRef,
    },

    /// The edge does not exist.
    #[error("dependency {from} -> {to} does not exist")]
    DependencyNotFound {
        /// Predecessor endpoint.
        from: TaskRef,
        /// Successor endpoint.
        to: TaskRef,
    },

    /// The failed task already has a replacement.
    #[error("task {0} has already been replaced")]
    AlreadyReplaced(TaskRef),

    /// Time may only move forward.
    #[error("cannot move time backwards by {0} minutes")]
    TimeMovesBackwards(i64),

    /// The logical clock would overflow.
    #[error("advancing time by {0} minutes overflows the clock")]
    TimeOverflow(i64),

    /// Task-level validation or state machine violation.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
}

/// Result type for container operations.
pub type SystemResult<T> = Result<T, SystemError>;
