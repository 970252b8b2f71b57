//! Read-only snapshots handed to presentation and session collaborators.
//!
//! Snapshots are owned copies; holding one never aliases live state.

use super::{Project, ProjectStatus};
use crate::task::domain::{
    Assignment, Deviation, FinishTiming, ProjectName, Role, Task, TaskName, TaskRef, TaskStatus,
    Time, User, Username,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Owning project.
    pub project: ProjectName,
    /// Task name.
    pub name: TaskName,
    /// Description.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Estimated duration in minutes.
    pub estimated_duration: u64,
    /// Acceptable deviation.
    pub deviation: Deviation,
    /// Required role slots.
    pub required_roles: Vec<Role>,
    /// Unfilled role slots.
    pub open_roles: Vec<Role>,
    /// Filled role slots keyed by user.
    pub assignments: BTreeMap<Username, Role>,
    /// Start time, once executing.
    pub start_time: Option<Time>,
    /// End time, once ended.
    pub end_time: Option<Time>,
    /// Predecessors in reference order.
    pub previous: Vec<TaskRef>,
    /// Successors in reference order.
    pub next: Vec<TaskRef>,
    /// Replacement of this failed task.
    pub replacement: Option<TaskRef>,
    /// Failed task this task replaces.
    pub replaces: Option<TaskRef>,
    /// Timing classification for finished tasks.
    pub finish_timing: Option<FinishTiming>,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        Self {
            project: task.project().clone(),
            name: task.name().clone(),
            description: task.description().to_owned(),
            status: task.status(),
            estimated_duration: task.estimated_duration(),
            deviation: task.deviation(),
            required_roles: task.required_roles().to_vec(),
            open_roles: task.open_slots(),
            assignments: task.committed().clone(),
            start_time: task.start_time(),
            end_time: task.end_time(),
            previous: task.previous().iter().cloned().collect(),
            next: task.next().iter().cloned().collect(),
            replacement: task.replacement().cloned(),
            replaces: task.replaces().cloned(),
            finish_timing: task.finish_timing(),
        }
    }
}

/// Snapshot of a project and its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Project name.
    pub name: ProjectName,
    /// Description.
    pub description: String,
    /// Creation time.
    pub creation_time: Time,
    /// Due time.
    pub due_time: Time,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Whether the project is open past its due time.
    pub overdue: bool,
    /// Tasks in display order.
    pub tasks: Vec<TaskSnapshot>,
}

impl ProjectSnapshot {
    /// Captures `project` as seen at logical time `now`.
    #[must_use]
    pub fn capture(project: &Project, now: Time) -> Self {
        Self {
            name: project.name().clone(),
            description: project.description().to_owned(),
            creation_time: project.creation_time(),
            due_time: project.due_time(),
            status: project.status(),
            overdue: project.is_overdue(now),
            tasks: project.tasks().iter().map(TaskSnapshot::from).collect(),
        }
    }
}

/// Snapshot of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    /// Username.
    pub name: Username,
    /// Held roles.
    pub roles: Vec<Role>,
    /// Most recent assignment.
    pub assignment: Option<Assignment>,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            name: user.name().clone(),
            roles: user.roles().iter().copied().collect(),
            assignment: user.assignment().cloned(),
        }
    }
}

/// Snapshot of the whole container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Current logical time.
    pub clock: Time,
    /// Projects in creation order.
    pub projects: Vec<ProjectSnapshot>,
    /// Users ordered by name.
    pub users: Vec<UserSnapshot>,
}
