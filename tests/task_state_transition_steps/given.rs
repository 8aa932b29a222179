//! Given steps for task state transition BDD scenarios.

use eyre::WrapErr;
use rstest_bdd_macros::given;
use timecard::tracking::domain::{TaskDraft, TaskEvent, TaskName};

use super::world::TaskTransitionWorld;

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut TaskTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let project = world
        .service
        .find_or_create_project(&name)
        .wrap_err("create project for transition scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task named "{name}" in that project"#)]
fn task_named(world: &mut TaskTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let project = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let draft = TaskDraft::new(project.id(), TaskName::new(name)?, "ada");
    let created = world
        .service
        .create_task(draft)
        .wrap_err("create task for transition scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"the task has received "{event}""#)]
fn task_has_received(world: &mut TaskTransitionWorld, event: String) -> Result<(), eyre::Report> {
    let parsed = TaskEvent::try_from(event.as_str())?;
    let number = world.task()?.number();
    let report = world
        .service
        .fire(number, parsed)
        .wrap_err("apply transition in scenario setup")?;
    world.task = Some(report.task);
    Ok(())
}
