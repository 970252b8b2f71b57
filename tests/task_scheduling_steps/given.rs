//! Given steps for task scheduling BDD scenarios.

use super::world::{SchedulingWorld, parse_task};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskman::{
    command::domain::Command,
    task::domain::{ProjectName, Role, TaskSpec, Time, Username},
};

#[given(r#"a project "{name}" due at minute {due:u64}"#)]
fn project_exists(world: &mut SchedulingWorld, name: String, due: u64) -> Result<(), eyre::Report> {
    let command = Command::create_project(ProjectName::new(name)?, "", Time::from_minutes(due));
    world.setup(command).wrap_err("create project for scenario")
}

#[given(r#"a task "{task}" requiring "{role}""#)]
fn task_exists(world: &mut SchedulingWorld, task: String, role: String) -> Result<(), eyre::Report> {
    let reference = parse_task(&task)?;
    let required = Role::try_from(role.as_str())?;
    let spec = TaskSpec::new(reference.task().clone(), 30, [required]);
    world
        .setup(Command::create_task(reference.project().clone(), spec))
        .wrap_err("create task for scenario")
}

#[given(r#""{successor}" depends on "{predecessor}""#)]
fn dependency_exists(
    world: &mut SchedulingWorld,
    successor: String,
    predecessor: String,
) -> Result<(), eyre::Report> {
    let command = Command::add_dependency(parse_task(&predecessor)?, parse_task(&successor)?);
    world.setup(command).wrap_err("add dependency for scenario")
}

#[given(r#""{user}" has been assigned to "{task}" as "{role}""#)]
fn user_assigned(
    world: &mut SchedulingWorld,
    user: String,
    task: String,
    role: String,
) -> Result<(), eyre::Report> {
    let command = Command::assign_user(
        parse_task(&task)?,
        Username::new(user)?,
        Role::try_from(role.as_str())?,
    );
    world.setup(command).wrap_err("assign user for scenario")
}
