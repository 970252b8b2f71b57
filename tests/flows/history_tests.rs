//! Undo and redo across sessions with several users.

use std::sync::Arc;

use super::helpers::{Session, create_project, project, session, spec, task_ref, username};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use taskman::{
    command::{
        domain::Command,
        error::CommandError,
        services::{CommandManager, SharedTaskMan},
    },
    task::domain::{ReplacementSpec, Role, TaskName, User},
};

fn brewing_session() -> eyre::Result<Vec<Command>> {
    Ok(vec![
        create_project("Omer", 2000),
        create_project("Tap", 3000),
        Command::create_task(project("Omer"), spec("Mash", 20, [Role::JavaProgrammer])),
        Command::create_task(
            project("Tap"),
            spec("Pour", 5, [Role::PythonProgrammer]).with_previous([task_ref("Omer", "Mash")]),
        ),
        Command::assign_user(task_ref("Omer", "Mash"), username("alice"), Role::JavaProgrammer),
        Command::fail_task(task_ref("Omer", "Mash")),
        Command::replace_task(
            task_ref("Omer", "Mash"),
            ReplacementSpec::new(TaskName::new("Remash")?, 25),
        ),
        Command::assign_user(task_ref("Omer", "Remash"), username("carol"), Role::JavaProgrammer),
        Command::finish_task(task_ref("Omer", "Remash")),
        Command::delete_project(project("Omer")),
    ])
}

#[rstest]
fn undoing_a_whole_session_restores_the_start(mut session: Session) -> eyre::Result<()> {
    let start = session.system.snapshot();
    for command in brewing_session()? {
        session.run(command, "manager")?;
    }
    let end = session.system.snapshot();
    ensure!(session.system.projects().len() == 1);

    while session.commands.last_executed().is_some() {
        session.undo("manager")?;
    }
    ensure!(session.system.snapshot() == start);

    while session.commands.last_undone().is_some() {
        session.redo("manager")?;
    }
    ensure!(session.system.snapshot() == end);
    Ok(())
}

#[rstest]
fn users_undo_only_their_own_commands(mut session: Session) -> eyre::Result<()> {
    session.run(create_project("Cellar", 500), "alice")?;
    session.run(create_project("Vault", 500), "bob")?;

    ensure!(
        session.undo("alice")
            == Err(CommandError::IncorrectUser {
                expected: username("bob"),
                actual: username("alice"),
            })
    );
    session.undo("bob")?;
    ensure!(matches!(
        session.redo("alice"),
        Err(CommandError::IncorrectUser { .. })
    ));
    session.undo("alice")?;
    ensure!(session.system.projects().is_empty());
    Ok(())
}

#[rstest]
fn advancing_time_is_a_barrier_for_undo(mut session: Session) -> eyre::Result<()> {
    session.run(create_project("Cellar", 500), "alice")?;
    session.run(Command::advance_time(10), "alice")?;

    ensure!(session.undo("alice") == Err(CommandError::UndoNotPossible("advance_time")));
    ensure!(session.system.project(&project("Cellar")).is_some());
    ensure!(session.commands.undone_commands().is_empty());
    Ok(())
}

#[rstest]
fn new_command_discards_undone_history(mut session: Session) -> eyre::Result<()> {
    session.run(create_project("Cellar", 500), "alice")?;
    session.undo("alice")?;
    session.run(create_project("Vault", 500), "alice")?;

    ensure!(session.redo("alice") == Err(CommandError::EmptyRedoStack));
    ensure!(session.system.project(&project("Cellar")).is_none());
    Ok(())
}

#[rstest]
fn shared_session_is_usable_from_worker_threads(session: Session) -> eyre::Result<()> {
    let shared = SharedTaskMan::new(session.system, CommandManager::new(Arc::new(DefaultClock)));
    shared.register_user(User::new(username("dave"), [Role::SysAdmin])?)?;

    let worker = shared.clone();
    std::thread::spawn(move || worker.execute(create_project("Cellar", 500), username("dave")))
        .join()
        .map_err(|_| eyre::eyre!("worker thread panicked"))??;

    ensure!(shared.read(|system| system.project(&project("Cellar")).is_some())?);
    ensure!(
        shared.undo_last(&username("alice"))
            == Err(CommandError::IncorrectUser {
                expected: username("dave"),
                actual: username("alice"),
            })
    );
    shared.undo_last(&username("dave"))?;
    ensure!(shared.read(|system| system.projects().is_empty())?);
    Ok(())
}
