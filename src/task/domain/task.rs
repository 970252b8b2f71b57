//! Task aggregate root and its execution state machine.

use super::{
    Deviation, FinishTiming, ProjectName, Role, TaskDomainError, TaskName, TaskRef, TaskStatus,
    Time, Username,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Parameter object describing a task to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task name, unique within the target project.
    pub name: TaskName,
    /// Free-form description.
    pub description: String,
    /// Estimated duration in minutes.
    pub estimated_duration: u64,
    /// Acceptable deviation from the estimate.
    pub deviation: Deviation,
    /// Role slots that must be filled before work starts.
    pub required_roles: Vec<Role>,
    /// Tasks that must finish before this one.
    pub previous: BTreeSet<TaskRef>,
    /// Tasks that wait for this one.
    pub next: BTreeSet<TaskRef>,
}

impl TaskSpec {
    /// Creates a spec with required fields and no dependencies.
    #[must_use]
    pub fn new(
        name: TaskName,
        estimated_duration: u64,
        required_roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            name,
            description: String::new(),
            estimated_duration,
            deviation: Deviation::default(),
            required_roles: required_roles.into_iter().collect(),
            previous: BTreeSet::new(),
            next: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the acceptable deviation.
    #[must_use]
    pub const fn with_deviation(mut self, deviation: Deviation) -> Self {
        self.deviation = deviation;
        self
    }

    /// Sets the predecessor tasks.
    #[must_use]
    pub fn with_previous(mut self, previous: impl IntoIterator<Item = TaskRef>) -> Self {
        self.previous = previous.into_iter().collect();
        self
    }

    /// Sets the successor tasks.
    #[must_use]
    pub fn with_next(mut self, next: impl IntoIterator<Item = TaskRef>) -> Self {
        self.next = next.into_iter().collect();
        self
    }

    /// Validates fields that do not depend on other tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRoleSet`],
    /// [`TaskDomainError::NonDeveloperRole`] or
    /// [`TaskDomainError::ZeroDuration`].
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.required_roles.is_empty() {
            return Err(TaskDomainError::EmptyRoleSet);
        }
        if let Some(role) = self.required_roles.iter().find(|role| !role.is_developer()) {
            return Err(TaskDomainError::NonDeveloperRole(*role));
        }
        if self.estimated_duration == 0 {
            return Err(TaskDomainError::ZeroDuration);
        }
        Ok(())
    }
}

/// Parameter object describing a replacement for a failed task.
///
/// Roles are inherited from the failed task, so they are not part of the
/// spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementSpec {
    /// Name of the replacement, unique within the failed task's project.
    pub name: TaskName,
    /// Free-form description.
    pub description: String,
    /// Estimated duration in minutes.
    pub estimated_duration: u64,
    /// Acceptable deviation from the estimate.
    pub deviation: Deviation,
}

impl ReplacementSpec {
    /// Creates a replacement spec with an empty description and no deviation.
    #[must_use]
    pub const fn new(name: TaskName, estimated_duration: u64) -> Self {
        Self {
            name,
            description: String::new(),
            estimated_duration,
            deviation: Deviation::from_percent(0),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the acceptable deviation.
    #[must_use]
    pub const fn with_deviation(mut self, deviation: Deviation) -> Self {
        self.deviation = deviation;
        self
    }

    /// Builds the task spec for the replacement.
    #[must_use]
    pub fn into_spec(self, required_roles: Vec<Role>) -> TaskSpec {
        TaskSpec {
            name: self.name,
            description: self.description,
            estimated_duration: self.estimated_duration,
            deviation: self.deviation,
            required_roles,
            previous: BTreeSet::new(),
            next: BTreeSet::new(),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    name: TaskName,
    project: ProjectName,
    description: String,
    estimated_duration: u64,
    deviation: Deviation,
    required_roles: Vec<Role>,
    status: TaskStatus,
    start_time: Option<Time>,
    end_time: Option<Time>,
    previous: BTreeSet<TaskRef>,
    next: BTreeSet<TaskRef>,
    replacement: Option<TaskRef>,
    replaces: Option<TaskRef>,
    committed: BTreeMap<Username, Role>,
}

impl Task {
    /// Creates a task owned by `project`.
    ///
    /// The initial status is `Available` when every declared predecessor is
    /// already satisfied, otherwise `Unavailable`. Only this task's side of
    /// each edge is recorded; the container wires the reverse pointers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when [`TaskSpec::validate`] fails.
    pub fn new(
        project: ProjectName,
        spec: TaskSpec,
        predecessors_satisfied: bool,
    ) -> Result<Self, TaskDomainError> {
        spec.validate()?;
        let status = if predecessors_satisfied {
            TaskStatus::Available
        } else {
            TaskStatus::Unavailable
        };
        Ok(Self {
            name: spec.name,
            project,
            description: spec.description,
            estimated_duration: spec.estimated_duration,
            deviation: spec.deviation,
            required_roles: spec.required_roles,
            status,
            start_time: None,
            end_time: None,
            previous: spec.previous,
            next: spec.next,
            replacement: None,
            replaces: None,
            committed: BTreeMap::new(),
        })
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the owning project name.
    #[must_use]
    pub const fn project(&self) -> &ProjectName {
        &self.project
    }

    /// Returns a cross-project reference to this task.
    #[must_use]
    pub fn reference(&self) -> TaskRef {
        TaskRef::new(self.project.clone(), self.name.clone())
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the estimated duration in minutes.
    #[must_use]
    pub const fn estimated_duration(&self) -> u64 {
        self.estimated_duration
    }

    /// Returns the acceptable deviation.
    #[must_use]
    pub const fn deviation(&self) -> Deviation {
        self.deviation
    }

    /// Returns the required role slots.
    #[must_use]
    pub fn required_roles(&self) -> &[Role] {
        &self.required_roles
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the logical start time, once execution has begun.
    #[must_use]
    pub const fn start_time(&self) -> Option<Time> {
        self.start_time
    }

    /// Returns the logical end time, once execution has ended.
    #[must_use]
    pub const fn end_time(&self) -> Option<Time> {
        self.end_time
    }

    /// Returns the predecessor references.
    #[must_use]
    pub const fn previous(&self) -> &BTreeSet<TaskRef> {
        &self.previous
    }

    /// Returns the successor references.
    #[must_use]
    pub const fn next(&self) -> &BTreeSet<TaskRef> {
        &self.next
    }

    /// Returns the task that replaces this failed task, if any.
    #[must_use]
    pub const fn replacement(&self) -> Option<&TaskRef> {
        self.replacement.as_ref()
    }

    /// Returns the failed task this task replaces, if any.
    #[must_use]
    pub const fn replaces(&self) -> Option<&TaskRef> {
        self.replaces.as_ref()
    }

    /// Returns the filled role slots keyed by user.
    #[must_use]
    pub const fn committed(&self) -> &BTreeMap<Username, Role> {
        &self.committed
    }

    /// Returns the role slots that are still unfilled.
    #[must_use]
    pub fn open_slots(&self) -> Vec<Role> {
        let mut open = self.required_roles.clone();
        for role in self.committed.values() {
            if let Some(index) = open.iter().position(|candidate| candidate == role) {
                open.remove(index);
            }
        }
        open
    }

    /// Moves the task to `target` when the state machine allows it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncorrectTaskStatus`] when the transition is
    /// not allowed; the status is left unchanged.
    pub fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(self.incorrect_status());
        }
        self.status = target;
        Ok(())
    }

    /// Fills an open slot for `role` with `user`.
    ///
    /// The task becomes `Pending` on the first assignment and `Executing`,
    /// with its start time set to `now`, once every slot is filled.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncorrectTaskStatus`] unless the task is
    /// `Available` or `Pending`, [`TaskDomainError::UserAlreadyAssigned`]
    /// when the user already fills a slot, and
    /// [`TaskDomainError::NoOpenSlot`] when no slot for `role` is open.
    pub fn assign(
        &mut self,
        user: Username,
        role: Role,
        now: Time,
    ) -> Result<(), TaskDomainError> {
        if !matches!(self.status, TaskStatus::Available | TaskStatus::Pending) {
            return Err(self.incorrect_status());
        }
        if self.committed.contains_key(&user) {
            return Err(TaskDomainError::UserAlreadyAssigned {
                user,
                task: self.reference(),
            });
        }
        if !self.open_slots().contains(&role) {
            return Err(TaskDomainError::NoOpenSlot {
                task: self.reference(),
                role,
            });
        }

        if self.status == TaskStatus::Available {
            self.transition_to(TaskStatus::Pending)?;
        }
        self.committed.insert(user, role);
        if self.open_slots().is_empty() {
            self.transition_to(TaskStatus::Executing)?;
            self.start_time = Some(now);
        }
        Ok(())
    }

    /// Releases the slot held by `user` and returns its role.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncorrectTaskStatus`] unless the task is
    /// `Pending`, or [`TaskDomainError::UserNotAssigned`].
    pub fn unassign(&mut self, user: &Username) -> Result<Role, TaskDomainError> {
        if self.status != TaskStatus::Pending {
            return Err(self.incorrect_status());
        }
        let role = self.remove_commitment(user)?;
        if self.committed.is_empty() {
            self.transition_to(TaskStatus::Available)?;
        }
        Ok(role)
    }

    /// Completes execution normally at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncorrectTaskStatus`] unless the task is
    /// `Executing`, or [`TaskDomainError::EndBeforeStart`].
    pub fn finish(&mut self, now: Time) -> Result<(), TaskDomainError> {
        self.complete(TaskStatus::Finished, now)
    }

    /// Completes execution abnormally at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncorrectTaskStatus`] unless the task is
    /// `Executing`, or [`TaskDomainError::EndBeforeStart`].
    pub fn fail(&mut self, now: Time) -> Result<(), TaskDomainError> {
        self.complete(TaskStatus::Failed, now)
    }

    /// Classifies the actual duration of a finished task.
    ///
    /// Returns `None` unless the task is `Finished`.
    #[must_use]
    pub fn finish_timing(&self) -> Option<FinishTiming> {
        if self.status != TaskStatus::Finished {
            return None;
        }
        let elapsed = self.end_time?.minutes_since(self.start_time?)?;
        let whole = u128::from(Deviation::WHOLE);
        let actual = u128::from(elapsed) * whole;
        let estimate = u128::from(self.estimated_duration);
        let tolerance = u128::from(self.deviation.basis_points());
        if actual < estimate * whole.saturating_sub(tolerance) {
            Some(FinishTiming::Early)
        } else if actual > estimate * (whole + tolerance) {
            Some(FinishTiming::Delayed)
        } else {
            Some(FinishTiming::OnTime)
        }
    }

    /// Re-evaluates availability after a change to the predecessor set.
    ///
    /// Returns `true` when the status changed. Statuses other than
    /// `Available` and `Unavailable` are never touched.
    pub(crate) fn refresh_availability(&mut self, predecessors_satisfied: bool) -> bool {
        let target = match (self.status, predecessors_satisfied) {
            (TaskStatus::Unavailable, true) => TaskStatus::Available,
            (TaskStatus::Available, false) => TaskStatus::Unavailable,
            _ => return false,
        };
        self.status = target;
        true
    }

    pub(crate) fn insert_previous(&mut self, task: TaskRef) -> bool {
        self.previous.insert(task)
    }

    pub(crate) fn remove_previous(&mut self, task: &TaskRef) -> bool {
        self.previous.remove(task)
    }

    pub(crate) fn insert_next(&mut self, task: TaskRef) -> bool {
        self.next.insert(task)
    }

    pub(crate) fn remove_next(&mut self, task: &TaskRef) -> bool {
        self.next.remove(task)
    }

    pub(crate) fn set_replacement(&mut self, replacement: Option<TaskRef>) {
        self.replacement = replacement;
    }

    pub(crate) fn set_replaces(&mut self, replaces: Option<TaskRef>) {
        self.replaces = replaces;
    }

    /// Reverses an assignment, including the start of execution it caused.
    ///
    /// Reversal path only: forward unassignment goes through
    /// [`Task::unassign`].
    pub(crate) fn revoke_assignment(&mut self, user: &Username) -> Result<(), TaskDomainError> {
        match self.status {
            TaskStatus::Executing if self.end_time.is_none() => {
                if !self.committed.contains_key(user) {
                    return Err(self.not_assigned(user));
                }
                self.status = TaskStatus::Pending;
                self.start_time = None;
            }
            TaskStatus::Pending => {}
            _ => return Err(self.incorrect_status()),
        }
        self.remove_commitment(user)?;
        if self.committed.is_empty() {
            self.status = TaskStatus::Available;
        }
        Ok(())
    }

    /// Reverses a finish or failure, returning the task to `Executing`.
    pub(crate) fn reopen(&mut self) -> Result<(), TaskDomainError> {
        if !self.status.is_terminal() {
            return Err(self.incorrect_status());
        }
        self.status = TaskStatus::Executing;
        self.end_time = None;
        Ok(())
    }

    fn complete(&mut self, target: TaskStatus, now: Time) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(self.incorrect_status());
        }
        if self.start_time.is_some_and(|start| now < start) {
            return Err(TaskDomainError::EndBeforeStart(self.reference()));
        }
        self.status = target;
        self.end_time = Some(now);
        Ok(())
    }

    fn remove_commitment(&mut self, user: &Username) -> Result<Role, TaskDomainError> {
        self.committed
            .remove(user)
            .ok_or_else(|| self.not_assigned(user))
    }

    fn not_assigned(&self, user: &Username) -> TaskDomainError {
        TaskDomainError::UserNotAssigned {
            user: user.clone(),
            task: self.reference(),
        }
    }

    fn incorrect_status(&self) -> TaskDomainError {
        TaskDomainError::IncorrectTaskStatus {
            task: self.reference(),
            status: self.status,
        }
    }
}
