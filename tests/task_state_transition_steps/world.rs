//! Shared world state for task state transition BDD scenarios.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::fixture;
use timecard::tracking::{
    adapters::memory::InMemoryTrackerStore,
    domain::{Project, Task},
    services::{TrackingError, TrackingService},
};

use crate::test_helpers::StepClock;

/// Seconds between successive clock readings.
pub const CLOCK_STEP_SECONDS: i64 = 300;

/// Service type used by the BDD world.
pub type TestTrackingService = TrackingService<InMemoryTrackerStore, StepClock>;

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub service: TestTrackingService,
    pub project: Option<Project>,
    pub task: Option<Task>,
    pub last_error: Option<TrackingError>,
}

impl TaskTransitionWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let service = TrackingService::new(
            Arc::new(InMemoryTrackerStore::new()),
            Arc::new(StepClock::every(TimeDelta::seconds(CLOCK_STEP_SECONDS))),
        );

        Self {
            service,
            project: None,
            task: None,
            last_error: None,
        }
    }

    /// Returns the task under test.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}
