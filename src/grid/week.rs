//! Half-hour heat-map blocks for the week view.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::log_debug;
use crate::models::{Activity, TimeSpan};

const ENABLE_LOGS: bool = false;

pub const BLOCKS_PER_DAY: usize = 48;
const BLOCK_SECS: i64 = 1_800;

/// Category used for activities that carry none.
const UNCATEGORIZED: &str = "other";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekTimeBlock {
    pub block_index: usize,
    pub start_hour: u32,
    pub start_minute: u32,
    pub active_secs: i64,
    pub dominant_category: Option<String>,
    /// 0 (nothing) to 4 (at least 80% of the block active).
    pub intensity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub total_hours: f64,
    pub blocks: Vec<WeekTimeBlock>,
    pub category_hours: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub days: Vec<WeekDay>,
    pub total_hours: f64,
    /// Mean over days with any activity.
    pub average_daily_hours: f64,
    pub most_active_day: Option<String>,
}

fn intensity(active_secs: i64) -> u8 {
    if active_secs <= 0 {
        return 0;
    }
    let percent = active_secs as f64 / BLOCK_SECS as f64 * 100.0;
    match percent {
        p if p >= 80.0 => 4,
        p if p >= 60.0 => 3,
        p if p >= 40.0 => 2,
        _ => 1,
    }
}

/// Spread `activities` over the 48 half-hour blocks of `day`.
///
/// Activities are clipped to `day`; the parts outside are ignored.
pub fn week_blocks(activities: &[Activity], day: TimeSpan) -> Vec<WeekTimeBlock> {
    let mut active = [0i64; BLOCKS_PER_DAY];
    let mut categories: Vec<BTreeMap<&str, i64>> = vec![BTreeMap::new(); BLOCKS_PER_DAY];

    for activity in activities {
        let (Some(start), Some(end)) = (activity.start_time, activity.effective_end()) else {
            continue;
        };
        let Some(span) = TimeSpan::new(start, end).clip_to(&day) else {
            continue;
        };
        let category = match activity.category.trim() {
            "" => UNCATEGORIZED,
            name => name,
        };

        let first = ((span.start - day.start) / BLOCK_SECS) as usize;
        let last = (((span.end - 1 - day.start) / BLOCK_SECS) as usize).min(BLOCKS_PER_DAY - 1);
        for index in first..=last {
            let block = TimeSpan::new(
                day.start + index as i64 * BLOCK_SECS,
                day.start + (index as i64 + 1) * BLOCK_SECS,
            );
            let Some(overlap) = span.clip_to(&block) else {
                continue;
            };
            active[index] += overlap.duration_secs();
            *categories[index].entry(category).or_insert(0) += overlap.duration_secs();
        }
    }

    (0..BLOCKS_PER_DAY)
        .map(|index| {
            let active_secs = active[index].min(BLOCK_SECS);
            let dominant_category = categories[index]
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(name, _)| name.to_string());
            WeekTimeBlock {
                block_index: index,
                start_hour: (index / 2) as u32,
                start_minute: if index % 2 == 0 { 0 } else { 30 },
                active_secs,
                dominant_category,
                intensity: intensity(active_secs),
            }
        })
        .collect()
}

/// One column of the week view. `None` when local midnight of `date` does not
/// exist in `tz`.
pub fn week_day<Tz: TimeZone>(date: NaiveDate, activities: &[Activity], tz: &Tz) -> Option<WeekDay> {
    let day = TimeSpan::calendar_day(date, tz)?;
    let blocks = week_blocks(activities, day);

    let mut category_hours: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_secs = 0i64;
    for activity in activities {
        let (Some(start), Some(end)) = (activity.start_time, activity.effective_end()) else {
            continue;
        };
        let Some(span) = TimeSpan::new(start, end).clip_to(&day) else {
            continue;
        };
        total_secs += span.duration_secs();
        let category = match activity.category.trim() {
            "" => UNCATEGORIZED,
            name => name,
        };
        *category_hours.entry(category.to_string()).or_insert(0.0) +=
            span.duration_secs() as f64 / 3600.0;
    }

    Some(WeekDay {
        date,
        day_name: date.format("%A").to_string(),
        total_hours: total_secs as f64 / 3600.0,
        blocks,
        category_hours,
    })
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Seven days starting on the Monday of the week containing `date`.
pub fn week_summary<Tz: TimeZone>(date: NaiveDate, activities: &[Activity], tz: &Tz) -> WeekSummary {
    let monday = week_start(date);
    let days: Vec<WeekDay> = (0..7)
        .filter_map(|offset| week_day(monday + Duration::days(offset), activities, tz))
        .collect();

    let total_hours: f64 = days.iter().map(|d| d.total_hours).sum();
    let active_days = days.iter().filter(|d| d.total_hours > 0.0).count();
    let average_daily_hours = if active_days > 0 {
        total_hours / active_days as f64
    } else {
        0.0
    };
    let most_active_day = days
        .iter()
        .filter(|d| d.total_hours > 0.0)
        .fold(None::<&WeekDay>, |best, day| match best {
            Some(b) if b.total_hours >= day.total_hours => Some(b),
            _ => Some(day),
        })
        .map(|d| d.day_name.clone());

    log_debug!(
        "week of {}: {:.1}h over {} active days",
        monday,
        total_hours,
        active_days
    );

    WeekSummary {
        week_start: monday,
        days,
        total_hours,
        average_daily_hours,
        most_active_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn midnight(day: u32) -> i64 {
        TimeSpan::calendar_day(date(day), &Utc).unwrap().start
    }

    fn activity(id: i64, start: i64, secs: i64, category: &str) -> Activity {
        Activity {
            id,
            start_time: Some(start),
            end_time: Some(start + secs),
            duration_seconds: secs as f64,
            app_name: Some("Code".into()),
            window_title: String::new(),
            category: category.into(),
            project: None,
        }
    }

    #[test]
    fn blocks_cover_the_day_in_half_hours() {
        let day = TimeSpan::calendar_day(date(14), &Utc).unwrap();
        let blocks = week_blocks(&[], day);
        assert_eq!(blocks.len(), BLOCKS_PER_DAY);
        assert_eq!((blocks[19].start_hour, blocks[19].start_minute), (9, 30));
        assert!(blocks.iter().all(|b| b.intensity == 0 && b.dominant_category.is_none()));
    }

    #[test]
    fn intensity_follows_block_coverage() {
        let start = midnight(14);
        let day = TimeSpan::calendar_day(date(14), &Utc).unwrap();
        let activities = [
            activity(1, start, 1_500, "coding"),
            activity(2, start + 1_800, 1_200, "coding"),
            activity(3, start + 3_600, 800, "coding"),
            activity(4, start + 5_400, 100, "coding"),
        ];
        let blocks = week_blocks(&activities, day);
        let levels: Vec<u8> = blocks[..5].iter().map(|b| b.intensity).collect();
        assert_eq!(levels, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn activity_spanning_blocks_is_split() {
        let start = midnight(14) + 9 * 3600 + 20 * 60;
        let day = TimeSpan::calendar_day(date(14), &Utc).unwrap();
        let blocks = week_blocks(&[activity(1, start, 1_800, "writing")], day);
        assert_eq!(blocks[18].active_secs, 600);
        assert_eq!(blocks[19].active_secs, 1_200);
        assert_eq!(blocks[19].dominant_category.as_deref(), Some("writing"));
    }

    #[test]
    fn dominant_category_has_most_seconds() {
        let start = midnight(14);
        let day = TimeSpan::calendar_day(date(14), &Utc).unwrap();
        let activities = [
            activity(1, start, 300, "email"),
            activity(2, start + 300, 900, "coding"),
            activity(3, start + 1_200, 200, ""),
        ];
        let blocks = week_blocks(&activities, day);
        assert_eq!(blocks[0].dominant_category.as_deref(), Some("coding"));
    }

    #[test]
    fn activity_across_midnight_is_clipped() {
        let activities = [activity(1, midnight(15) - 900, 1_800, "coding")];
        let before = week_day(date(14), &activities, &Utc).unwrap();
        let after = week_day(date(15), &activities, &Utc).unwrap();
        assert_eq!(before.blocks[47].active_secs, 900);
        assert_eq!(after.blocks[0].active_secs, 900);
        assert_eq!(before.total_hours, 0.25);
        assert_eq!(after.category_hours.get("coding"), Some(&0.25));
    }

    #[test]
    fn summary_averages_over_active_days() {
        // 2025-03-12 is a Wednesday.
        let activities = [
            activity(1, midnight(10) + 9 * 3600, 7_200, "coding"),
            activity(2, midnight(12) + 9 * 3600, 3 * 3600, "coding"),
            activity(3, midnight(12) + 14 * 3600, 3600, "meetings"),
        ];
        let summary = week_summary(date(12), &activities, &Utc);

        assert_eq!(summary.week_start, date(10));
        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.days[0].day_name, "Monday");
        assert_eq!(summary.total_hours, 6.0);
        assert_eq!(summary.average_daily_hours, 3.0);
        assert_eq!(summary.most_active_day.as_deref(), Some("Wednesday"));
    }

    #[test]
    fn empty_week_has_no_most_active_day() {
        let summary = week_summary(date(14), &[], &Utc);
        assert_eq!(summary.total_hours, 0.0);
        assert_eq!(summary.average_daily_hours, 0.0);
        assert!(summary.most_active_day.is_none());
    }
}
