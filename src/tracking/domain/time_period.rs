//! Immutable records of contiguous running intervals.

use super::{TaskId, TimePeriodId};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One interval during which a task was running.
///
/// Time periods are only ever created by the pause and finish transitions and
/// are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    id: TimePeriodId,
    task_id: TaskId,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl TimePeriod {
    /// Records a new interval for `task_id`.
    #[must_use]
    pub fn record(task_id: TaskId, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        Self {
            id: TimePeriodId::new(),
            task_id,
            started_at,
            ended_at,
        }
    }

    /// Returns the period identifier.
    #[must_use]
    pub const fn id(&self) -> TimePeriodId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns when the interval began.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the interval ended.
    #[must_use]
    pub const fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Returns the interval length, clamped at zero.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        (self.ended_at - self.started_at).max(TimeDelta::zero())
    }
}
