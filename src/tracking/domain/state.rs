//! Task lifecycle states, events, and the transition table joining them.

use super::machine::{TransitionRule, TransitionTable};
use super::{ParseTaskEventError, ParseTaskStateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task has been created but its clock has never run.
    Unstarted,
    /// Task clock is running.
    Running,
    /// Task clock is stopped but the task is still open.
    Paused,
    /// Task is complete. No transitions leave this state.
    Finished,
}

impl TaskState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Unstarted, Self::Running, Self::Paused, Self::Finished];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unstarted" => Ok(Self::Unstarted),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "finished" => Ok(Self::Finished),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named request to change a task's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// Start the clock for the first time.
    Start,
    /// Stop a running clock.
    Pause,
    /// Restart a paused clock.
    Resume,
    /// Close the task.
    Finish,
}

impl TaskEvent {
    /// Every event.
    pub const ALL: [Self; 4] = [Self::Start, Self::Pause, Self::Resume, Self::Finish];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Finish => "finish",
        }
    }
}

impl TryFrom<&str> for TaskEvent {
    type Error = ParseTaskEventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "start" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "finish" => Ok(Self::Finish),
            _ => Err(ParseTaskEventError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALREADY_WORKING: &str = "You're already working on that task.";
const STILL_WORKING: &str = "You're still working on that task. Resume it instead.";
const NOT_STARTED: &str = "You haven't started that task yet.";
const ALREADY_PAUSED: &str = "You've already paused that task.";
const ALREADY_FINISHED: &str = "You've already finished that task.";
const WORKING_ALREADY: &str = "You're working on that task already.";

/// Builds the task lifecycle transition table.
///
/// | event  | to       | from              |
/// |--------|----------|-------------------|
/// | start  | running  | unstarted         |
/// | pause  | paused   | running           |
/// | resume | running  | paused            |
/// | finish | finished | running, paused   |
#[must_use]
pub fn task_transitions() -> TransitionTable<TaskState, TaskEvent> {
    TransitionTable::new()
        .with_rule(
            TaskEvent::Start,
            TransitionRule::to(TaskState::Running)
                .from([TaskState::Unstarted])
                .reject(TaskState::Running, ALREADY_WORKING)
                .reject(TaskState::Paused, STILL_WORKING),
        )
        .with_rule(
            TaskEvent::Pause,
            TransitionRule::to(TaskState::Paused)
                .from([TaskState::Running])
                .reject(TaskState::Unstarted, NOT_STARTED)
                .reject(TaskState::Paused, ALREADY_PAUSED)
                .reject(TaskState::Finished, ALREADY_FINISHED),
        )
        .with_rule(
            TaskEvent::Resume,
            TransitionRule::to(TaskState::Running)
                .from([TaskState::Paused])
                .reject(TaskState::Unstarted, NOT_STARTED)
                .reject(TaskState::Running, WORKING_ALREADY),
        )
        .with_rule(
            TaskEvent::Finish,
            TransitionRule::to(TaskState::Finished)
                .from([TaskState::Running, TaskState::Paused])
                .reject(TaskState::Unstarted, NOT_STARTED)
                .reject(TaskState::Finished, ALREADY_FINISHED),
        )
}
