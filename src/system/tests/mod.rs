//! Unit tests for the project container and dependency graph.


use crate::system::services::TaskManSystem;
use crate::task::domain::{ProjectName, Role, TaskName, TaskRef, TaskSpec, Time, User, Username};

fn project(name: &str) -> ProjectName {
    ProjectName::new(name).expect("valid project name")
}

fn task_ref(project_name: &str, task: &str) -> TaskRef {
    TaskRef::from_parts(project_name, task).expect("valid task reference")
}

fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

fn spec(name: &str, roles: impl IntoIterator<Item = Role>) -> TaskSpec {
    TaskSpec::new(TaskName::new(name).expect("valid task name"), 10, roles)
}

/// A system holding projects "Omer" and "Tap" plus three developers.
fn seeded_system() -> TaskManSystem {
    let mut system = TaskManSystem::new();
    for (name, roles) in [
        ("alice", vec![Role::JavaProgrammer]),
        ("bob", vec![Role::PythonProgrammer]),
        ("carol", vec![Role::SysAdmin, Role::JavaProgrammer]),
    ] {
        let user = User::new(username(name), roles).expect("valid user");
        system.register_user(user).expect("unique username");
    }
    system
        .create_project(project("Omer"), "Brewery", Time::from_minutes(2000))
        .expect("project created");
    system
        .create_project(project("Tap"), "Taproom", Time::from_minutes(3000))
        .expect("project created");
    system
}
