//! Then steps for task scheduling BDD scenarios.

use super::world::{SchedulingWorld, parse_task};
use rstest_bdd_macros::then;
use taskman::{
    command::error::CommandError,
    system::domain::SystemError,
    task::domain::{ProjectName, TaskStatus, Username},
};

#[then(r#"task "{task}" is "{status}""#)]
fn task_status_is(world: &SchedulingWorld, task: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let reference = parse_task(&task)?;
    let found = world
        .system
        .task(&reference)
        .ok_or_else(|| eyre::eyre!("task {reference} not found"))?;
    eyre::ensure!(
        found.status() == expected,
        "expected {reference} to be {expected}, found {}",
        found.status()
    );
    Ok(())
}

#[then(r#"project "{name}" is "{status}""#)]
fn project_status_is(world: &SchedulingWorld, name: String, status: String) -> Result<(), eyre::Report> {
    let project_name = ProjectName::new(name)?;
    let project = world
        .system
        .project(&project_name)
        .ok_or_else(|| eyre::eyre!("project {project_name} not found"))?;
    eyre::ensure!(
        project.status().as_str() == status,
        "expected {project_name} to be {status}, found {}",
        project.status().as_str()
    );
    Ok(())
}

#[then(r#"project "{name}" is overdue"#)]
fn project_is_overdue(world: &SchedulingWorld, name: String) -> Result<(), eyre::Report> {
    let project_name = ProjectName::new(name)?;
    let snapshot = world
        .system
        .project_snapshot(&project_name)
        .ok_or_else(|| eyre::eyre!("project {project_name} not found"))?;
    eyre::ensure!(snapshot.overdue, "expected {project_name} to be overdue");
    Ok(())
}

#[then("the command is rejected as a loop dependency")]
fn rejected_as_loop(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if !matches!(
        outcome,
        Err(CommandError::System(SystemError::LoopDependency { .. }))
    ) {
        return Err(eyre::eyre!("expected LoopDependency error, got {outcome:?}"));
    }
    Ok(())
}

#[then(r#"the command is rejected because it belongs to "{owner}""#)]
fn rejected_for_owner(world: &SchedulingWorld, owner: String) -> Result<(), eyre::Report> {
    let expected_owner = Username::new(owner)?;
    let outcome = world.outcome()?;
    match outcome {
        Err(CommandError::IncorrectUser { expected, .. }) if *expected == expected_owner => Ok(()),
        other => Err(eyre::eyre!(
            "expected IncorrectUser error for {expected_owner}, got {other:?}"
        )),
    }
}

#[then("the command is rejected as irreversible")]
fn rejected_as_irreversible(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if !matches!(outcome, Err(CommandError::UndoNotPossible(_))) {
        return Err(eyre::eyre!("expected UndoNotPossible error, got {outcome:?}"));
    }
    Ok(())
}

#[then("the system holds {count:usize} dependency edges")]
fn dependency_count_is(world: &SchedulingWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.system.dependency_count();
    eyre::ensure!(actual == count, "expected {count} dependency edges, found {actual}");
    Ok(())
}

#[then("the redo log is empty")]
fn redo_log_is_empty(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.commands.undone_commands().is_empty(),
        "expected no undone commands"
    );
    Ok(())
}
