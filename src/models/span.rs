use chrono::{Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of epoch seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    pub start: i64,
    pub end: i64,
}

impl TimeSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Local-midnight to local-midnight bounds of `date` in `tz`.
    ///
    /// Returns `None` when midnight does not exist in `tz` (a DST gap at 00:00).
    pub fn calendar_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<Self> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        let start = tz.from_local_datetime(&midnight).earliest()?;
        let next_midnight = (date + Duration::days(1)).and_hms_opt(0, 0, 0)?;
        let end = tz.from_local_datetime(&next_midnight).earliest()?;
        Some(Self::new(start.timestamp(), end.timestamp()))
    }

    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with `bounds`, or `None` when nothing is left.
    pub fn clip_to(&self, bounds: &TimeSpan) -> Option<TimeSpan> {
        let clipped = TimeSpan::new(self.start.max(bounds.start), self.end.min(bounds.end));
        (!clipped.is_empty()).then_some(clipped)
    }
}
