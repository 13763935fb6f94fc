use serde::{Deserialize, Serialize};

use crate::log_debug;
use crate::models::TimeSpan;

const ENABLE_LOGS: bool = false;

/// Shortest in-focus interval worth showing. Also the noise floor for away periods.
pub const MIN_ACTIVITY_SECS: i64 = 60;

/// In-focus interval inferred as the complement of away periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInterval {
    pub start_time: i64,
    pub end_time: i64,
    pub duration_seconds: i64,
}

impl ActivityInterval {
    fn from_span(span: TimeSpan) -> Self {
        Self {
            start_time: span.start,
            end_time: span.end,
            duration_seconds: span.duration_secs(),
        }
    }
}

/// Complement of `away` within `day`, keeping intervals of at least `min_secs`.
///
/// Away periods may arrive unsorted, overlapping, nested or inverted. Away
/// periods shorter than `min_secs` are noise and never split the day. When
/// no away period remains, the whole day span is returned as one interval
/// without the minimum-duration check.
///
/// Because sub-floor away periods are discarded, the result is only
/// disjoint from away periods of at least `min_secs`; an interval may cover
/// a shorter one.
pub fn infer_activity(day: TimeSpan, away: &[TimeSpan], min_secs: i64) -> Vec<ActivityInterval> {
    let mut breaks: Vec<TimeSpan> = away
        .iter()
        .filter(|span| span.duration_secs() >= min_secs)
        .copied()
        .collect();

    if breaks.is_empty() {
        if day.end < day.start {
            return Vec::new();
        }
        return vec![ActivityInterval::from_span(day)];
    }

    breaks.sort_by_key(|span| span.start);

    let mut intervals = Vec::new();
    let mut push_candidate = |start: i64, end: i64| {
        if end - start >= min_secs {
            intervals.push(ActivityInterval::from_span(TimeSpan::new(start, end)));
        }
    };

    let mut cursor = day.start;
    for span in &breaks {
        let gap_end = span.start.min(day.end);
        if gap_end > cursor {
            push_candidate(cursor, gap_end);
        }
        cursor = cursor.max(span.end);
    }
    if cursor < day.end {
        push_candidate(cursor, day.end);
    }

    log_debug!(
        "inferred {} activity intervals from {} away periods",
        intervals.len(),
        breaks.len()
    );
    intervals
}
