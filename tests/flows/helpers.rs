//! Shared helpers for command-driven integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskman::{
    command::{domain::Command, error::CommandResult, services::CommandManager},
    system::services::TaskManSystem,
    task::domain::{ProjectName, Role, TaskName, TaskRef, TaskSpec, Time, User, Username},
};

/// Command manager type used by the integration tests.
pub type TestManager = CommandManager<DefaultClock>;

/// A system paired with the manager that mutates it.
pub struct Session {
    /// System under test.
    pub system: TaskManSystem,
    /// Command log for the system.
    pub commands: TestManager,
}

impl Session {
    /// Executes `command` as `actor`.
    ///
    /// # Errors
    ///
    /// Returns the manager's error when the command is rejected.
    pub fn run(&mut self, command: Command, actor: &str) -> CommandResult<()> {
        self.commands
            .execute(&mut self.system, command, username(actor))
            .map(|_| ())
    }

    /// Undoes the latest command as `actor`.
    ///
    /// # Errors
    ///
    /// Returns the manager's error when undo is refused.
    pub fn undo(&mut self, actor: &str) -> CommandResult<()> {
        self.commands
            .undo_last(&mut self.system, &username(actor))
            .map(|_| ())
    }

    /// Redoes the latest undone command as `actor`.
    ///
    /// # Errors
    ///
    /// Returns the manager's error when redo is refused.
    pub fn redo(&mut self, actor: &str) -> CommandResult<()> {
        self.commands
            .redo_last(&mut self.system, &username(actor))
            .map(|_| ())
    }
}

/// Provides a system with four registered users and an empty command log.
///
/// - `alice` is a java programmer.
/// - `bob` is a python programmer.
/// - `carol` is a sysadmin and java programmer.
/// - `manager` is a project manager.
#[fixture]
pub fn session() -> Session {
    let mut system = TaskManSystem::new();
    for (name, roles) in [
        ("alice", vec![Role::JavaProgrammer]),
        ("bob", vec![Role::PythonProgrammer]),
        ("carol", vec![Role::SysAdmin, Role::JavaProgrammer]),
        ("manager", vec![Role::ProjectManager]),
    ] {
        let user = User::new(username(name), roles).expect("valid user");
        system.register_user(user).expect("unique username");
    }
    Session {
        system,
        commands: CommandManager::new(Arc::new(DefaultClock)),
    }
}

/// Builds a project name.
pub fn project(name: &str) -> ProjectName {
    ProjectName::new(name).expect("valid project name")
}

/// Builds a task reference.
pub fn task_ref(project_name: &str, task: &str) -> TaskRef {
    TaskRef::from_parts(project_name, task).expect("valid task reference")
}

/// Builds a username.
pub fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

/// Builds a task spec with the given estimate and required roles.
pub fn spec(name: &str, estimate: u64, roles: impl IntoIterator<Item = Role>) -> TaskSpec {
    TaskSpec::new(
        TaskName::new(name).expect("valid task name"),
        estimate,
        roles,
    )
}

/// Command creating a project due at `due` minutes.
pub fn create_project(name: &str, due: u64) -> Command {
    Command::create_project(project(name), "", Time::from_minutes(due))
}
