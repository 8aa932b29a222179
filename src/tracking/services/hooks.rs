//! Transition callbacks for the task lifecycle.

use std::sync::Arc;

use super::TrackingError;
use crate::tracking::{
    domain::{
        PendingTaskTransition, Task, TaskEvent, TaskState, TimePeriod,
        machine::{CallbackPhase, Callbacks},
    },
    ports::TimePeriodRepository,
};

/// Callback registry type for task transitions.
pub type TaskHooks = Callbacks<TaskState, TaskEvent, TransitionScope, TrackingError>;

/// Everything a task callback may touch while a transition is in flight.
pub struct TransitionScope {
    task: Task,
    periods: Arc<dyn TimePeriodRepository>,
    recorded: Vec<TimePeriod>,
}

impl TransitionScope {
    /// Opens a scope for `task`.
    #[must_use]
    pub fn new(task: Task, periods: Arc<dyn TimePeriodRepository>) -> Self {
        Self {
            task,
            periods,
            recorded: Vec::new(),
        }
    }

    /// Returns the task being transitioned.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the task being transitioned for mutation.
    pub const fn task_mut(&mut self) -> &mut Task {
        &mut self.task
    }

    /// Returns the time periods created during this transition.
    #[must_use]
    pub fn recorded(&self) -> &[TimePeriod] {
        &self.recorded
    }

    /// Closes the scope, returning the task and created periods.
    #[must_use]
    pub fn into_parts(self) -> (Task, Vec<TimePeriod>) {
        (self.task, self.recorded)
    }
}

/// Builds the lifecycle callbacks.
///
/// - `start` and `resume` stamp `last_started_at` before saving.
/// - `pause` records the interval that just ended after saving.
/// - `finish` does the same, but only when the task was running; a paused
///   task already recorded its interval when it was paused.
#[must_use]
pub fn task_hooks() -> TaskHooks {
    let mut hooks = TaskHooks::new();
    hooks
        .register(TaskEvent::Start, CallbackPhase::BeforeSave, stamp_last_started)
        .register(TaskEvent::Resume, CallbackPhase::BeforeSave, stamp_last_started)
        .register(TaskEvent::Pause, CallbackPhase::AfterSave, record_time_period)
        .register(
            TaskEvent::Finish,
            CallbackPhase::AfterSave,
            record_time_period_if_running,
        );
    hooks
}

fn stamp_last_started(
    pending: &PendingTaskTransition,
    scope: &mut TransitionScope,
) -> Result<(), TrackingError> {
    scope.task.stamp_started(pending.at());
    Ok(())
}

fn record_time_period(
    pending: &PendingTaskTransition,
    scope: &mut TransitionScope,
) -> Result<(), TrackingError> {
    let period = TimePeriod::record(scope.task.id(), scope.task.last_started_at(), pending.at());
    scope.periods.store_time_period(&period)?;
    tracing::debug!(
        task = %scope.task.number(),
        seconds = period.duration().num_seconds(),
        "recorded time period"
    );
    scope.recorded.push(period);
    Ok(())
}

fn record_time_period_if_running(
    pending: &PendingTaskTransition,
    scope: &mut TransitionScope,
) -> Result<(), TrackingError> {
    if pending.from() != TaskState::Running {
        return Ok(());
    }
    record_time_period(pending, scope)
}
