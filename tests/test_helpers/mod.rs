//! Shared fixtures for integration tests.

use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

/// Clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl StepClock {
    /// Creates a clock whose first reading is 2024-03-01 09:00 UTC.
    pub fn every(step: TimeDelta) -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .expect("fixed timestamp should be valid");
        Self {
            now: Mutex::new(start),
            step,
        }
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

/// Temporary directory removed on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: Utf8PathBuf,
}

impl ScratchDir {
    /// Reserves a unique path under the system temporary directory.
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("timecard-it-{}", Uuid::new_v4()));
        Self {
            path: Utf8PathBuf::from_path_buf(dir).expect("temp dir should be UTF-8"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.path).ok();
    }
}
