//! Unit tests for commands and the command manager.


use crate::command::services::CommandManager;
use crate::system::services::TaskManSystem;
use crate::task::domain::{
    ProjectName, Role, TaskName, TaskRef, TaskSpec, Time, User, Username,
};
use mockable::DefaultClock;
use std::sync::Arc;

fn project(name: &str) -> ProjectName {
    ProjectName::new(name).expect("valid project name")
}

fn task_ref(project_name: &str, task: &str) -> TaskRef {
    TaskRef::from_parts(project_name, task).expect("valid task reference")
}

fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

fn task_name(name: &str) -> TaskName {
    TaskName::new(name).expect("valid task name")
}

fn spec(name: &str, roles: impl IntoIterator<Item = Role>) -> TaskSpec {
    TaskSpec::new(task_name(name), 10, roles)
}

fn manager() -> CommandManager<DefaultClock> {
    CommandManager::new(Arc::new(DefaultClock))
}

/// Builds a system exercising every task status and a cross-project edge.
///
/// - `Omer/Mash` (java + python) is pending with alice.
/// - `Omer/Boil` waits on `Omer/Mash`.
/// - `Omer/Brew` is executing with carol since minute 0.
/// - `Omer/Chill` is available.
/// - `Tap/Pour` waits on `Omer/Brew`.
/// - `Tap/Fail` was failed by bob; `Tap/Serve` waits on it.
///
/// The clock reads 5.
fn brewery() -> TaskManSystem {
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
    let build = |system: &mut TaskManSystem| -> crate::system::domain::SystemResult<()> {
        system.create_project(project("Omer"), "Brewery", Time::from_minutes(2000))?;
        system.create_project(project("Tap"), "Taproom", Time::from_minutes(3000))?;
        system.add_task(
            &project("Omer"),
            spec("Mash", [Role::JavaProgrammer, Role::PythonProgrammer]),
        )?;
        system.add_task(
            &project("Omer"),
            spec("Boil", [Role::SysAdmin]).with_previous([task_ref("Omer", "Mash")]),
        )?;
        system.add_task(&project("Omer"), spec("Brew", [Role::SysAdmin]))?;
        system.add_task(&project("Omer"), spec("Chill", [Role::JavaProgrammer]))?;
        system.add_task(
            &project("Tap"),
            spec("Pour", [Role::PythonProgrammer]).with_previous([task_ref("Omer", "Brew")]),
        )?;
        system.add_task(&project("Tap"), spec("Fail", [Role::PythonProgrammer]))?;
        system.add_task(
            &project("Tap"),
            spec("Serve", [Role::PythonProgrammer]).with_previous([task_ref("Tap", "Fail")]),
        )?;
        system.assign_user(
            &task_ref("Omer", "Mash"),
            &username("alice"),
            Role::JavaProgrammer,
        )?;
        system.assign_user(&task_ref("Omer", "Brew"), &username("carol"), Role::SysAdmin)?;
        system.assign_user(
            &task_ref("Tap", "Fail"),
            &username("bob"),
            Role::PythonProgrammer,
        )?;
        system.fail_task(&task_ref("Tap", "Fail"))?;
        system.advance_time(5)?;
        Ok(())
    };
    build(&mut system).expect("brewery fixture builds");
    system
}
