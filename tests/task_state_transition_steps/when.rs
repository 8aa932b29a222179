//! When steps for task state transition BDD scenarios.

use rstest_bdd_macros::when;
use timecard::tracking::domain::TaskEvent;

use super::world::TaskTransitionWorld;

#[when(r#"the task receives "{event}""#)]
fn task_receives(world: &mut TaskTransitionWorld, event: String) -> Result<(), eyre::Report> {
    let parsed = TaskEvent::try_from(event.as_str())?;
    let number = world.task()?.number();

    match world.service.fire(number, parsed) {
        Ok(report) => {
            world.task = Some(report.task);
            world.last_error = None;
        }
        Err(error) => {
            world.task = Some(world.service.task(number)?);
            world.last_error = Some(error);
        }
    }
    Ok(())
}
