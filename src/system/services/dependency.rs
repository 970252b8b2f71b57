//! Dependency graph engine.
//!
//! The graph is implicit: edges are the `previous`/`next` reference sets of
//! every task across every project. A replacement stands in for the failed
//! task it replaces, so the failed task's successors wait on it as well.
//! The graph must stay acyclic after every successful mutation, so an edge
//! `from -> to` is refused whenever `from` is already reachable from `to`.

use super::TaskManSystem;
use crate::system::domain::{SystemError, SystemResult};
use crate::task::domain::{Task, TaskDomainError, TaskRef, TaskStatus};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

impl TaskManSystem {
    /// Returns whether `target` is reachable from `start` along successor
    /// edges. A task reaches itself.
    ///
    /// A replacement also reaches the failed task it replaces, and through
    /// it that task's successors.
    #[must_use]
    pub fn reaches(&self, start: &TaskRef, target: &TaskRef) -> bool {
        let mut visited: HashSet<&TaskRef> = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(task) = self.task(current) {
                stack.extend(task.next().iter());
                stack.extend(task.replaces());
            }
        }
        false
    }

    /// Returns the number of dependency edges in the whole system.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.projects()
            .iter()
            .flat_map(|project| project.tasks())
            .map(|task| task.next().len())
            .sum()
    }

    /// Returns whether a predecessor no longer blocks its successors.
    ///
    /// A task is satisfied once finished, or once failed and replaced by a
    /// task that is itself satisfied.
    #[must_use]
    pub fn is_satisfied(&self, task: &TaskRef) -> bool {
        let mut visited: HashSet<&TaskRef> = HashSet::new();
        let mut current = task;
        loop {
            if !visited.insert(current) {
                return false;
            }
            let Some(found) = self.task(current) else {
                return false;
            };
            match (found.status(), found.replacement()) {
                (TaskStatus::Finished, _) => return true,
                (TaskStatus::Failed, Some(replacement)) => current = replacement,
                _ => return false,
            }
        }
    }

    /// Adds the edge `from -> to` and demotes `to` to `Unavailable`.
    ///
    /// A predecessor that is already satisfied cannot gain successors, so a
    /// new edge always makes its target wait.
    pub(crate) fn add_dependency(&mut self, from: &TaskRef, to: &TaskRef) -> SystemResult<()> {
        let predecessor = self.require_task(from)?;
        if self.is_satisfied(from) {
            return Err(TaskDomainError::IncorrectTaskStatus {
                task: from.clone(),
                status: predecessor.status(),
            }
            .into());
        }
        let successor = self.require_task(to)?;
        if !successor.status().accepts_dependency_changes() {
            return Err(TaskDomainError::IncorrectTaskStatus {
                task: to.clone(),
                status: successor.status(),
            }
            .into());
        }
        if successor.previous().contains(from) {
            return Err(SystemError::DuplicateDependency {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if self.reaches(to, from) {
            return Err(SystemError::LoopDependency {
                from: from.clone(),
                to: to.clone(),
            });
        }

        self.link(from, to);
        self.refresh_availability(to);
        info!(from = %from, to = %to, "dependency added");
        Ok(())
    }

    /// Removes the edge `from -> to` and promotes `to` when nothing else
    /// blocks it.
    pub(crate) fn remove_dependency(&mut self, from: &TaskRef, to: &TaskRef) -> SystemResult<()> {
        self.require_task(from)?;
        let successor = self.require_task(to)?;
        if !successor.previous().contains(from) {
            return Err(SystemError::DependencyNotFound {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if !successor.status().accepts_dependency_changes() {
            return Err(TaskDomainError::IncorrectTaskStatus {
                task: to.clone(),
                status: successor.status(),
            }
            .into());
        }

        if let Some(predecessor) = self.task_mut(from) {
            predecessor.remove_next(to);
        }
        if let Some(dependent) = self.task_mut(to) {
            dependent.remove_previous(from);
        }
        self.refresh_availability(to);
        info!(from = %from, to = %to, "dependency removed");
        Ok(())
    }

    /// Validates the edges a new task `reference` would bring with it.
    pub(crate) fn check_new_edges(
        &self,
        reference: &TaskRef,
        previous: &BTreeSet<TaskRef>,
        next: &BTreeSet<TaskRef>,
    ) -> SystemResult<()> {
        for predecessor in previous {
            self.require_task(predecessor)?;
        }
        for successor in next {
            let task = self.require_task(successor)?;
            if !task.status().accepts_dependency_changes() {
                return Err(TaskDomainError::IncorrectTaskStatus {
                    task: successor.clone(),
                    status: task.status(),
                }
                .into());
            }
        }
        let closes_loop = next.iter().find(|successor| {
            previous
                .iter()
                .any(|predecessor| self.reaches(successor, predecessor))
        });
        if let Some(successor) = closes_loop {
            return Err(SystemError::LoopDependency {
                from: reference.clone(),
                to: successor.clone(),
            });
        }
        Ok(())
    }

    /// Refuses to remove `task` when it stands in for a failed task whose
    /// successors have already started.
    ///
    /// Those successors would be left running behind a predecessor that is
    /// no longer satisfied.
    pub(crate) fn check_stand_in_removal(&self, task: &TaskRef) -> SystemResult<()> {
        let mut visited: HashSet<&TaskRef> = HashSet::new();
        let mut current = self.task(task).and_then(Task::replaces);
        while let Some(failed) = current {
            if !visited.insert(failed) {
                break;
            }
            let Some(found) = self.task(failed) else {
                break;
            };
            for successor in found.next() {
                let Some(dependent) = self.task(successor) else {
                    continue;
                };
                if !dependent.status().accepts_dependency_changes() {
                    return Err(TaskDomainError::IncorrectTaskStatus {
                        task: successor.clone(),
                        status: dependent.status(),
                    }
                    .into());
                }
            }
            current = found.replaces();
        }
        Ok(())
    }

    /// Re-evaluates `task`'s availability from its predecessors.
    pub(crate) fn refresh_availability(&mut self, task: &TaskRef) {
        let Some(found) = self.task(task) else {
            return;
        };
        let satisfied = found
            .previous()
            .iter()
            .all(|predecessor| self.is_satisfied(predecessor));
        if let Some(target) = self.task_mut(task) {
            if target.refresh_availability(satisfied) {
                debug!(task = %task, status = %target.status(), "availability changed");
            }
        }
    }

    /// Re-evaluates every successor whose predecessor's satisfaction depends
    /// on `task`: its own successors and those of each failed task it
    /// replaces, transitively.
    pub(crate) fn propagate_from(&mut self, task: &TaskRef) {
        let mut dependents = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(task.clone());
        while let Some(reference) = current.take() {
            if !visited.insert(reference.clone()) {
                break;
            }
            let Some(found) = self.task(&reference) else {
                break;
            };
            dependents.extend(found.next().iter().cloned());
            current = found.replaces().cloned();
        }
        for dependent in &dependents {
            self.refresh_availability(dependent);
        }
    }

    pub(super) fn link(&mut self, from: &TaskRef, to: &TaskRef) {
        if let Some(predecessor) = self.task_mut(from) {
            predecessor.insert_next(to.clone());
        }
        if let Some(dependent) = self.task_mut(to) {
            dependent.insert_previous(from.clone());
        }
    }
}
