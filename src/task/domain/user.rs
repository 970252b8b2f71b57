//! Users who fill task role slots.

use super::{Role, TaskDomainError, TaskRef, TaskStatus, Username};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user's binding to a role slot on a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Task holding the slot.
    pub task: TaskRef,
    /// Role the user fills on the task.
    pub role: Role,
}

/// What has to happen to a user's current assignment before they can take a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassignment {
    /// No live assignment; the user is free.
    Free,
    /// The user leaves a task that has not started yet.
    Release(Assignment),
}

/// User entity.
///
/// A user works on at most one task at a time. Pending assignments are
/// released when a new one is taken; executing ones are never abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: Username,
    roles: BTreeSet<Role>,
    assignment: Option<Assignment>,
}

impl User {
    /// Creates a user holding `roles`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UserWithoutRoles`] when `roles` is empty.
    pub fn new(
        name: Username,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, TaskDomainError> {
        let held: BTreeSet<Role> = roles.into_iter().collect();
        if held.is_empty() {
            return Err(TaskDomainError::UserWithoutRoles(name));
        }
        Ok(Self {
            name,
            roles: held,
            assignment: None,
        })
    }

    /// Returns the username.
    #[must_use]
    pub const fn name(&self) -> &Username {
        &self.name
    }

    /// Returns the held roles.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Returns whether the user holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the most recent assignment, which may point at a task that has
    /// already ended.
    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Decides how the current assignment is handled when the user takes a
    /// slot on `target`.
    ///
    /// `current_status` is the status of the currently assigned task, or
    /// `None` when the user has no assignment or the task no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UserAlreadyExecuting`] when the current task
    /// is executing, and [`TaskDomainError::UserAlreadyAssigned`] when the
    /// user already holds a slot on `target`.
    pub fn prepare_reassignment(
        &self,
        target: &TaskRef,
        current_status: Option<TaskStatus>,
    ) -> Result<Reassignment, TaskDomainError> {
        let (Some(current), Some(status)) = (self.assignment.as_ref(), current_status) else {
            return Ok(Reassignment::Free);
        };
        match status {
            TaskStatus::Executing => Err(TaskDomainError::UserAlreadyExecuting {
                user: self.name.clone(),
                task: current.task.clone(),
            }),
            TaskStatus::Pending if &current.task == target => {
                Err(TaskDomainError::UserAlreadyAssigned {
                    user: self.name.clone(),
                    task: target.clone(),
                })
            }
            TaskStatus::Pending => Ok(Reassignment::Release(current.clone())),
            _ => Ok(Reassignment::Free),
        }
    }

    pub(crate) fn set_assignment(&mut self, assignment: Option<Assignment>) {
        self.assignment = assignment;
    }
}
