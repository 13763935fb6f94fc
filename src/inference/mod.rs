pub mod activity;
pub mod stats;

pub use activity::{infer_activity, ActivityInterval, MIN_ACTIVITY_SECS};
pub use stats::{day_stats, DayStats, TopApp, TOP_APP_COUNT};

use crate::models::{AwayPeriod, TimeSpan};

/// Completed away periods as time spans; in-progress ones are skipped.
pub fn away_spans(periods: &[AwayPeriod]) -> Vec<TimeSpan> {
    periods
        .iter()
        .filter_map(|period| Some(TimeSpan::new(period.start_time?, period.end_time?)))
        .collect()
}
