//! Unit tests for time tracking.

mod service_tests;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Mutex, PoisonError};

/// Clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub(super) struct StepClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl StepClock {
    pub(super) fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            now: Mutex::new(start),
            step,
        }
    }

    pub(super) fn starting_at_epoch(step_seconds: i64) -> Self {
        Self::new(epoch(), TimeDelta::seconds(step_seconds))
    }

    /// Returns the reading the next call to `utc` will produce.
    pub(super) fn peek(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        let reading = *now;
        *now = reading + self.step;
        reading
    }
}

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("fixed timestamp should be valid")
}
