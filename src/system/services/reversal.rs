//! Inverse operations used when commands are undone.
//!
//! Each primitive assumes it runs directly after the forward operation it
//! reverses, with nothing else in between; the command log's stack
//! discipline guarantees this.

use super::TaskManSystem;
use crate::system::domain::{Project, SystemError, SystemResult};
use crate::task::domain::{Assignment, Task, TaskRef, TaskStatus, User, Username};
use tracing::info;

impl TaskManSystem {
    /// Puts a deleted project back at `index`, re-wiring edges that cross
    /// into it from other projects and restoring the affected users.
    pub(crate) fn restore_project(
        &mut self,
        index: usize,
        project: Project,
        users: &[User],
    ) -> SystemResult<()> {
        let name = project.name().clone();
        if self.project(&name).is_some() {
            return Err(SystemError::ProjectNameInUse(name));
        }
        let mut external_successors = Vec::new();
        let mut external_predecessors = Vec::new();
        for task in project.tasks() {
            let reference = task.reference();
            for previous in task.previous().iter().filter(|p| p.project() != &name) {
                external_predecessors.push((previous.clone(), reference.clone()));
            }
            for next in task.next().iter().filter(|n| n.project() != &name) {
                external_successors.push((reference.clone(), next.clone()));
            }
        }
        self.insert_project(index, project);

        for (predecessor, reference) in &external_predecessors {
            if let Some(other) = self.task_mut(predecessor) {
                other.insert_next(reference.clone());
            }
        }
        for (reference, successor) in &external_successors {
            if let Some(other) = self.task_mut(successor) {
                other.insert_previous(reference.clone());
            }
        }
        for user in users {
            self.put_user(user.clone());
        }
        for (_, successor) in &external_successors {
            self.refresh_availability(successor);
        }
        info!(project = %name, "project restored");
        Ok(())
    }

    /// Puts a deleted task back at `index` in its project.
    pub(crate) fn restore_task(&mut self, index: usize, task: Task, users: &[User]) -> SystemResult<()> {
        let reference = task.reference();
        let project = self.require_project(task.project())?;
        if project.task(task.name()).is_some() {
            return Err(SystemError::TaskNameInUse(reference));
        }
        self.attach(task, index);
        for user in users {
            self.put_user(user.clone());
        }
        info!(task = %reference, "task restored");
        Ok(())
    }

    /// Reverses an assignment, including any execution start it caused, and
    /// gives the user back the pending assignment it released.
    pub(crate) fn revoke_assignment(
        &mut self,
        task: &TaskRef,
        username: &Username,
        previous: Option<&Assignment>,
    ) -> SystemResult<()> {
        self.require_user(username)?;
        self.require_task_mut(task)?.revoke_assignment(username)?;

        let now = self.clock();
        if let Some(earlier) = previous {
            if let Some(earlier_task) = self.task_mut(&earlier.task) {
                let was_released = matches!(
                    earlier_task.status(),
                    TaskStatus::Available | TaskStatus::Pending
                ) && !earlier_task.committed().contains_key(username);
                if was_released {
                    earlier_task.assign(username.clone(), earlier.role, now)?;
                }
            }
        }
        if let Some(user) = self.users_mut().get_mut(username) {
            user.set_assignment(previous.cloned());
        }
        info!(user = %username, task = %task, "assignment revoked");
        Ok(())
    }

    /// Puts back a removed edge `from -> to`.
    ///
    /// Unlike [`Self::add_dependency`] the predecessor may already be
    /// satisfied, as it was when the edge was removed.
    pub(crate) fn restore_dependency(&mut self, from: &TaskRef, to: &TaskRef) -> SystemResult<()> {
        self.require_task(from)?;
        let successor = self.require_task(to)?;
        if successor.previous().contains(from) {
            return Err(SystemError::DuplicateDependency {
                from: from.clone(),
                to: to.clone(),
            });
        }
        self.link(from, to);
        self.refresh_availability(to);
        info!(from = %from, to = %to, "dependency restored");
        Ok(())
    }

    /// Returns a finished or failed task to `Executing` and re-blocks the
    /// successors its completion had released.
    pub(crate) fn reopen_task(&mut self, task: &TaskRef) -> SystemResult<()> {
        self.require_task_mut(task)?.reopen()?;
        self.propagate_from(task);
        self.refresh_project_status(task.project());
        info!(task = %task, "task reopened");
        Ok(())
    }
}
