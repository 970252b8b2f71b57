//! When steps for task scheduling BDD scenarios.

use super::world::{SchedulingWorld, parse_task};
use rstest_bdd_macros::when;
use taskman::{
    command::domain::Command,
    task::domain::{Role, Username},
};

#[when(r#""{user}" is assigned to "{task}" as "{role}""#)]
fn assign_user(
    world: &mut SchedulingWorld,
    user: String,
    task: String,
    role: String,
) -> Result<(), eyre::Report> {
    world.attempt(Command::assign_user(
        parse_task(&task)?,
        Username::new(user)?,
        Role::try_from(role.as_str())?,
    ))
}

#[when(r#""{task}" is finished"#)]
fn finish_task(world: &mut SchedulingWorld, task: String) -> Result<(), eyre::Report> {
    world.attempt(Command::finish_task(parse_task(&task)?))
}

#[when(r#"a dependency from "{from}" to "{to}" is added"#)]
fn add_dependency(world: &mut SchedulingWorld, from: String, to: String) -> Result<(), eyre::Report> {
    world.attempt(Command::add_dependency(parse_task(&from)?, parse_task(&to)?))
}

#[when("{minutes:i64} minutes pass")]
fn advance_time(world: &mut SchedulingWorld, minutes: i64) -> Result<(), eyre::Report> {
    world.attempt(Command::advance_time(minutes))
}

#[when(r#""{user}" undoes the last command"#)]
fn undo_last(world: &mut SchedulingWorld, user: String) -> Result<(), eyre::Report> {
    let actor = Username::new(user)?;
    let result = world
        .commands
        .undo_last(&mut world.system, &actor)
        .map(|_| ());
    world.last_result = Some(result);
    Ok(())
}

#[when(r#""{user}" redoes the last command"#)]
fn redo_last(world: &mut SchedulingWorld, user: String) -> Result<(), eyre::Report> {
    let actor = Username::new(user)?;
    let result = world
        .commands
        .redo_last(&mut world.system, &actor)
        .map(|_| ());
    world.last_result = Some(result);
    Ok(())
}
