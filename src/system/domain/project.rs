//! Project aggregate owning an ordered list of tasks.

use super::SystemError;
use crate::task::domain::{ProjectName, Task, TaskName, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// At least one task is still open, or the project has no tasks yet.
    Ongoing,
    /// Every task has reached a terminal status.
    Finished,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project aggregate root.
///
/// Task order is insertion order and doubles as display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: ProjectName,
    description: String,
    creation_time: Time,
    due_time: Time,
    status: ProjectStatus,
    tasks: Vec<Task>,
}

impl Project {
    /// Creates an empty, ongoing project.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DueBeforeCreation`] when `due_time` precedes
    /// `creation_time`.
    pub fn new(
        name: ProjectName,
        description: impl Into<String>,
        creation_time: Time,
        due_time: Time,
    ) -> Result<Self, SystemError> {
        if due_time < creation_time {
            return Err(SystemError::DueBeforeCreation {
                due: due_time,
                creation: creation_time,
            });
        }
        Ok(Self {
            name,
            description: description.into(),
            creation_time,
            due_time,
            status: ProjectStatus::Ongoing,
            tasks: Vec::new(),
        })
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn creation_time(&self) -> Time {
        self.creation_time
    }

    /// Returns the due time.
    #[must_use]
    pub const fn due_time(&self) -> Time {
        self.due_time
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns whether the project is still open at `now` past its due time.
    #[must_use]
    pub fn is_overdue(&self, now: Time) -> bool {
        self.status == ProjectStatus::Ongoing && now > self.due_time
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by name.
    #[must_use]
    pub fn task(&self, name: &TaskName) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    pub(crate) fn task_mut(&mut self, name: &TaskName) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.name() == name)
    }

    pub(crate) fn position(&self, name: &TaskName) -> Option<usize> {
        self.tasks.iter().position(|task| task.name() == name)
    }

    /// Inserts a task at `index`, clamped to the end of the list.
    pub(crate) fn insert_task(&mut self, index: usize, task: Task) {
        let at = index.min(self.tasks.len());
        self.tasks.insert(at, task);
        self.refresh_status();
    }

    pub(crate) fn remove_task(&mut self, name: &TaskName) -> Option<Task> {
        let index = self.position(name)?;
        let removed = self.tasks.remove(index);
        self.refresh_status();
        Some(removed)
    }

    /// Recomputes the status from the tasks' statuses.
    ///
    /// Returns `true` when the status changed.
    pub(crate) fn refresh_status(&mut self) -> bool {
        let finished = !self.tasks.is_empty()
            && self.tasks.iter().all(|task| task.status().is_terminal());
        let target = if finished {
            ProjectStatus::Finished
        } else {
            ProjectStatus::Ongoing
        };
        let changed = target != self.status;
        self.status = target;
        changed
    }
}
