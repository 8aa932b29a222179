//! Running-time totals and their human-readable rendering.

use super::TimePeriod;
use chrono::TimeDelta;
use std::fmt;

const UNITS: [(&str, i64); 4] = [("day", 86_400), ("hour", 3_600), ("minute", 60), ("second", 1)];

/// Accumulated running time across a task's time periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningTime {
    total: TimeDelta,
    periods: usize,
}

impl RunningTime {
    /// Sums the durations of `periods`.
    #[must_use]
    pub fn from_periods<'a>(periods: impl IntoIterator<Item = &'a TimePeriod>) -> Self {
        periods
            .into_iter()
            .fold(Self::default(), |acc, period| Self {
                total: acc.total + period.duration(),
                periods: acc.periods + 1,
            })
    }

    /// Returns the summed duration.
    #[must_use]
    pub const fn total(&self) -> TimeDelta {
        self.total
    }

    /// Returns how many periods were summed.
    #[must_use]
    pub const fn periods(&self) -> usize {
        self.periods
    }

    /// Returns the total as human-readable text, e.g. `1 hour, 5 minutes`.
    #[must_use]
    pub fn human(&self) -> String {
        humanize(self.total)
    }
}

impl Default for RunningTime {
    fn default() -> Self {
        Self {
            total: TimeDelta::zero(),
            periods: 0,
        }
    }
}

impl fmt::Display for RunningTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human())
    }
}

/// Renders a duration with whole days, hours, minutes and seconds.
///
/// Zero-valued units are omitted; a zero or negative duration renders as
/// `0 seconds`.
#[must_use]
pub fn humanize(duration: TimeDelta) -> String {
    let mut remaining = duration.num_seconds().max(0);
    let mut parts = Vec::new();
    for (unit, seconds) in UNITS {
        let count = remaining.div_euclid(seconds);
        remaining = remaining.rem_euclid(seconds);
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {unit}{plural}"));
        }
    }

    if parts.is_empty() {
        return "0 seconds".to_owned();
    }
    parts.join(", ")
}
