//! Then steps for task state transition BDD scenarios.

use chrono::TimeDelta;
use rstest_bdd_macros::then;
use timecard::tracking::domain::{TaskDomainError, TaskState};
use timecard::tracking::services::TrackingError;

use super::world::TaskTransitionWorld;

#[then(r#"the task state is "{state}""#)]
fn task_state_is(world: &TaskTransitionWorld, state: String) -> Result<(), eyre::Report> {
    let expected_state = TaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let stored = world.service.task(world.task()?.number())?;

    if stored.state() != expected_state {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected_state.as_str(),
            stored.state().as_str()
        ));
    }
    Ok(())
}

#[then("{count:usize} time periods are recorded")]
fn time_periods_recorded(world: &TaskTransitionWorld, count: usize) -> Result<(), eyre::Report> {
    let periods = world.service.time_periods(world.task()?.number())?;
    eyre::ensure!(
        periods.len() == count,
        "expected {count} periods, found {}",
        periods.len()
    );
    Ok(())
}

#[then("the task has run for {seconds:i64} seconds")]
fn task_has_run_for(world: &TaskTransitionWorld, seconds: i64) -> Result<(), eyre::Report> {
    let total = world.service.total_running_time(world.task()?.number())?;
    eyre::ensure!(
        total.total() == TimeDelta::seconds(seconds),
        "expected {seconds}s, found {}s",
        total.total().num_seconds()
    );
    Ok(())
}

#[then(r#"the transition is rejected with "{message}""#)]
fn transition_rejected(world: &TaskTransitionWorld, message: String) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected a rejected transition"))?;

    if !matches!(
        error,
        TrackingError::Domain(TaskDomainError::InvalidTransition { .. })
    ) {
        return Err(eyre::eyre!("expected InvalidTransition error, got {error:?}"));
    }
    eyre::ensure!(
        error.to_string() == message,
        "expected message {message:?}, got {:?}",
        error.to_string()
    );
    Ok(())
}
