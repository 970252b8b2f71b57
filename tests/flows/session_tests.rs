//! Project and task flows executed through the command manager.

use super::helpers::{Session, create_project, project, session, spec, task_ref, username};
use eyre::{bail, ensure};
use rstest::rstest;
use taskman::{
    command::{domain::Command, error::CommandError},
    system::domain::{ProjectStatus, SystemError},
    task::domain::{
        FinishTiming, ReplacementSpec, Role, TaskDomainError, TaskName, TaskStatus, Time,
    },
};

/// Creates project "Omer" with independent tasks T1 (sysadmin) and T2 (java).
fn with_two_tasks(mut session: Session) -> eyre::Result<Session> {
    session.run(create_project("Omer", 2000), "manager")?;
    session.run(
        Command::create_task(project("Omer"), spec("T1", 30, [Role::SysAdmin])),
        "manager",
    )?;
    session.run(
        Command::create_task(project("Omer"), spec("T2", 30, [Role::JavaProgrammer])),
        "manager",
    )?;
    Ok(session)
}

#[rstest]
fn hiring_a_brewer_finishes_the_project(mut session: Session) -> eyre::Result<()> {
    let hire = task_ref("Omer", "Hire brewer");
    session.run(create_project("Omer", 2000), "manager")?;
    session.run(
        Command::create_task(project("Omer"), spec("Hire brewer", 60, [Role::SysAdmin])),
        "manager",
    )?;
    ensure!(session.system.task(&hire).map(|task| task.status()) == Some(TaskStatus::Available));

    session.run(
        Command::assign_user(hire.clone(), username("carol"), Role::SysAdmin),
        "manager",
    )?;
    session.run(Command::advance_time(60), "manager")?;
    session.run(Command::finish_task(hire.clone()), "manager")?;

    let Some(task) = session.system.task(&hire) else {
        bail!("task disappeared");
    };
    ensure!(task.status() == TaskStatus::Finished);
    ensure!(task.start_time() == Some(Time::from_minutes(0)));
    ensure!(task.end_time() == Some(Time::from_minutes(60)));
    ensure!(task.finish_timing() == Some(FinishTiming::OnTime));
    ensure!(
        session.system.project(&project("Omer")).map(|omer| omer.status())
            == Some(ProjectStatus::Finished)
    );
    Ok(())
}

#[rstest]
fn dependent_task_waits_for_its_predecessor(session: Session) -> eyre::Result<()> {
    let mut session = with_two_tasks(session)?;
    let (t1, t2) = (task_ref("Omer", "T1"), task_ref("Omer", "T2"));
    session.run(Command::add_dependency(t1.clone(), t2.clone()), "manager")?;
    ensure!(session.system.task(&t2).map(|task| task.status()) == Some(TaskStatus::Unavailable));

    let refused = session.run(
        Command::assign_user(t2.clone(), username("alice"), Role::JavaProgrammer),
        "manager",
    );
    ensure!(matches!(
        refused,
        Err(CommandError::System(SystemError::Task(
            TaskDomainError::IncorrectTaskStatus {
                status: TaskStatus::Unavailable,
                ..
            }
        )))
    ));

    session.run(
        Command::assign_user(t1.clone(), username("carol"), Role::SysAdmin),
        "manager",
    )?;
    session.run(Command::finish_task(t1), "manager")?;
    ensure!(session.system.task(&t2).map(|task| task.status()) == Some(TaskStatus::Available));
    Ok(())
}

#[rstest]
fn closing_a_cycle_is_rejected_and_not_logged(session: Session) -> eyre::Result<()> {
    let mut session = with_two_tasks(session)?;
    let (t1, t2) = (task_ref("Omer", "T1"), task_ref("Omer", "T2"));
    session.run(Command::add_dependency(t1.clone(), t2.clone()), "manager")?;
    let logged = session.commands.executed_commands().len();

    let result = session.run(Command::add_dependency(t2.clone(), t1.clone()), "manager");

    ensure!(
        result
            == Err(CommandError::System(SystemError::LoopDependency {
                from: t2,
                to: t1,
            }))
    );
    ensure!(session.system.dependency_count() == 1);
    ensure!(session.commands.executed_commands().len() == logged);
    Ok(())
}

#[rstest]
fn dependencies_cross_project_boundaries(session: Session) -> eyre::Result<()> {
    let mut session = with_two_tasks(session)?;
    let pour = task_ref("Tap", "Pour");
    session.run(create_project("Tap", 3000), "manager")?;
    session.run(
        Command::create_task(
            project("Tap"),
            spec("Pour", 5, [Role::PythonProgrammer]).with_previous([task_ref("Omer", "T1")]),
        ),
        "manager",
    )?;

    ensure!(session.system.reaches(&task_ref("Omer", "T1"), &pour));
    ensure!(session.system.task(&pour).map(|task| task.status()) == Some(TaskStatus::Unavailable));
    let result = session.run(
        Command::add_dependency(pour.clone(), task_ref("Omer", "T1")),
        "manager",
    );
    ensure!(matches!(
        result,
        Err(CommandError::System(SystemError::LoopDependency { .. }))
    ));
    Ok(())
}

#[rstest]
fn replacement_stands_in_for_a_failed_task(session: Session) -> eyre::Result<()> {
    let mut session = with_two_tasks(session)?;
    let (t1, t2) = (task_ref("Omer", "T1"), task_ref("Omer", "T2"));
    let retry = task_ref("Omer", "T1 retry");
    session.run(Command::add_dependency(t1.clone(), t2.clone()), "manager")?;
    session.run(
        Command::assign_user(t1.clone(), username("carol"), Role::SysAdmin),
        "manager",
    )?;
    session.run(Command::fail_task(t1.clone()), "manager")?;
    session.run(
        Command::replace_task(t1.clone(), ReplacementSpec::new(TaskName::new("T1 retry")?, 45)),
        "manager",
    )?;

    let Some(replacement) = session.system.task(&retry) else {
        bail!("replacement was not created");
    };
    ensure!(replacement.status() == TaskStatus::Available);
    ensure!(replacement.required_roles() == [Role::SysAdmin]);
    ensure!(session.system.task(&t1).and_then(|task| task.replacement()) == Some(&retry));
    ensure!(session.system.task(&t2).map(|task| task.status()) == Some(TaskStatus::Unavailable));

    session.run(
        Command::assign_user(retry.clone(), username("carol"), Role::SysAdmin),
        "manager",
    )?;
    session.run(Command::finish_task(retry), "manager")?;
    ensure!(session.system.is_satisfied(&t1));
    ensure!(session.system.task(&t2).map(|task| task.status()) == Some(TaskStatus::Available));
    Ok(())
}

#[rstest]
fn project_past_due_is_reported_overdue(mut session: Session) -> eyre::Result<()> {
    session.run(create_project("Omer", 100), "manager")?;
    session.run(Command::advance_time(150), "manager")?;

    let Some(omer) = session.system.project_snapshot(&project("Omer")) else {
        bail!("project snapshot missing");
    };
    ensure!(omer.overdue);
    ensure!(omer.status == ProjectStatus::Ongoing);
    Ok(())
}

#[rstest]
fn project_due_before_now_is_rejected(mut session: Session) -> eyre::Result<()> {
    session.run(Command::advance_time(50), "manager")?;
    let result = session.run(create_project("Omer", 10), "manager");
    ensure!(matches!(
        result,
        Err(CommandError::System(SystemError::DueBeforeCreation { .. }))
    ));
    ensure!(session.system.projects().is_empty());
    Ok(())
}
