//! Headline numbers for one day: active time, breaks, longest focus stretch,
//! category split and the most used apps.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{Activity, AwayPeriod, TimeSpan};

/// Gaps between activities in this range count as breaks.
const MIN_BREAK_SECS: i64 = 60;
const MAX_BREAK_SECS: i64 = 7_200;

/// A gap shorter than this keeps the current focus stretch going.
const FOCUS_CONTINUITY_SECS: i64 = 300;

pub const TOP_APP_COUNT: usize = 6;

const SEEDED_CATEGORIES: [&str; 4] = ["focus", "meetings", "comms", "other"];
const FALLBACK_CATEGORY: &str = "other";
const BREAKS_KEY: &str = "breaks";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopApp {
    pub app_name: String,
    pub duration_secs: i64,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub total_active_secs: i64,
    pub total_hours: f64,
    pub break_count: usize,
    pub break_secs: i64,
    pub longest_focus_secs: i64,
    pub longest_focus_start: Option<i64>,
    pub longest_focus_end: Option<i64>,
    /// Seconds from the end of the latest finished away period to now, or to
    /// the end of the day for past days. `None` when nothing was recorded.
    pub time_since_last_break: Option<i64>,
    /// First to last activity, clamped to the day.
    pub day_span: Option<TimeSpan>,
    pub span_hours: f64,
    pub away_count: usize,
    pub away_secs: i64,
    /// Seconds per category, scaled to `total_active_secs`, plus a `breaks` entry.
    pub breakdown: BTreeMap<String, f64>,
    /// Share of each `breakdown` entry in active time plus breaks.
    pub breakdown_percent: BTreeMap<String, f64>,
    pub top_apps: Vec<TopApp>,
}

/// Compute the day's statistics from activities and away periods inside `bounds`.
///
/// `now` is the current epoch second; it only feeds `time_since_last_break`.
pub fn day_stats(activities: &[Activity], away: &[AwayPeriod], bounds: TimeSpan, now: i64) -> DayStats {
    if activities.is_empty() {
        return DayStats::default();
    }

    let away_spans: Vec<TimeSpan> = away
        .iter()
        .filter_map(|period| {
            TimeSpan::new(period.start_time?, period.end_time?).clip_to(&bounds)
        })
        .collect();

    let clipped: Vec<(TimeSpan, &Activity)> = activities
        .iter()
        .filter_map(|activity| {
            let span = TimeSpan::new(activity.start_time?, activity.effective_end()?).clip_to(&bounds)?;
            Some((span, activity))
        })
        .collect();

    let mut focus: Vec<(TimeSpan, &Activity)> = clipped
        .iter()
        .filter(|(span, _)| !away_spans.iter().any(|away| away.overlaps(span)))
        .copied()
        .collect();
    focus.sort_by_key(|(span, _)| span.start);

    let mut breakdown: BTreeMap<String, f64> = SEEDED_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), 0.0))
        .collect();
    for (span, activity) in &focus {
        *breakdown.entry(category_of(activity).to_string()).or_default() += span.duration_secs() as f64;
    }

    let mut stats = DayStats {
        away_count: away_spans.len(),
        away_secs: away_spans.iter().map(TimeSpan::duration_secs).sum(),
        time_since_last_break: away_spans
            .iter()
            .map(|span| span.end)
            .max()
            .map(|latest_end| (now.min(bounds.end) - latest_end).max(0)),
        top_apps: top_apps(&clipped),
        ..DayStats::default()
    };

    let (Some((first, _)), Some(latest_end)) = (focus.first(), focus.iter().map(|(s, _)| s.end).max()) else {
        breakdown.insert(BREAKS_KEY.to_string(), 0.0);
        stats.breakdown = breakdown;
        return stats;
    };
    let span = TimeSpan::new(first.start, latest_end);

    for pair in focus.windows(2) {
        let gap = pair[1].0.start - pair[0].0.end;
        if (MIN_BREAK_SECS..=MAX_BREAK_SECS).contains(&gap) {
            stats.break_count += 1;
            stats.break_secs += gap;
        }
    }

    let mut current_secs = 0;
    let mut current_start = first.start;
    let mut last_end: Option<i64> = None;
    for (activity, _) in &focus {
        match last_end {
            Some(end) if activity.start - end < FOCUS_CONTINUITY_SECS => {
                current_secs += activity.duration_secs();
            }
            _ => {
                current_secs = activity.duration_secs();
                current_start = activity.start;
            }
        }
        if current_secs > stats.longest_focus_secs {
            stats.longest_focus_secs = current_secs;
            stats.longest_focus_start = Some(current_start);
            stats.longest_focus_end = Some(activity.end);
        }
        last_end = Some(activity.end);
    }

    let away_in_span: i64 = away_spans
        .iter()
        .filter_map(|away| away.clip_to(&span))
        .map(|away| away.duration_secs())
        .sum();

    stats.total_active_secs = (span.duration_secs() - away_in_span).max(0);
    stats.total_hours = stats.total_active_secs as f64 / 3600.0;
    stats.span_hours = span.duration_secs() as f64 / 3600.0;
    stats.day_span = Some(span);

    // Focus spans may overlap; keep their proportions but scale to active time.
    let category_total: f64 = breakdown.values().sum();
    if category_total > 0.0 && stats.total_active_secs > 0 {
        let scale = stats.total_active_secs as f64 / category_total;
        breakdown.values_mut().for_each(|secs| *secs *= scale);
    }
    breakdown.insert(BREAKS_KEY.to_string(), stats.break_secs as f64);

    let with_breaks = (stats.total_active_secs + stats.break_secs) as f64;
    if with_breaks > 0.0 {
        stats.breakdown_percent = breakdown
            .iter()
            .map(|(category, secs)| (category.clone(), secs / with_breaks * 100.0))
            .collect();
    }
    stats.breakdown = breakdown;
    stats
}

fn category_of(activity: &Activity) -> &str {
    let category = activity.category.trim();
    if category.is_empty() {
        FALLBACK_CATEGORY
    } else {
        category
    }
}

/// Apps ranked by clipped duration, merged case-insensitively under their
/// first-seen spelling. Away time is not subtracted.
fn top_apps(clipped: &[(TimeSpan, &Activity)]) -> Vec<TopApp> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut apps: Vec<TopApp> = Vec::new();

    for (span, activity) in clipped {
        let Some(name) = activity.app_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let slot = *index.entry(name.to_lowercase()).or_insert_with(|| {
            apps.push(TopApp {
                app_name: name.to_string(),
                duration_secs: 0,
                category: String::new(),
            });
            apps.len() - 1
        });
        let app = &mut apps[slot];
        app.duration_secs += span.duration_secs();
        if app.category.is_empty() && !activity.category.trim().is_empty() {
            app.category = activity.category.trim().to_string();
        }
    }

    for app in &mut apps {
        if app.category.is_empty() {
            app.category = FALLBACK_CATEGORY.to_string();
        }
    }
    apps.sort_by(|a, b| b.duration_secs.cmp(&a.duration_secs));
    apps.truncate(TOP_APP_COUNT);
    apps
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: TimeSpan = TimeSpan {
        start: 0,
        end: 86_400,
    };

    /// A moment well after `DAY`, so the day counts as past.
    const NOW: i64 = 10 * 86_400;

    fn activity(id: i64, start: i64, end: i64) -> Activity {
        Activity {
            id,
            start_time: Some(start),
            end_time: Some(end),
            duration_seconds: (end - start) as f64,
            app_name: Some("Code".into()),
            window_title: String::new(),
            category: "focus".into(),
            project: None,
        }
    }

    fn app_activity(id: i64, start: i64, end: i64, app: &str, category: &str) -> Activity {
        Activity {
            app_name: Some(app.into()),
            category: category.into(),
            ..activity(id, start, end)
        }
    }

    fn away(id: i64, start: i64, end: Option<i64>) -> AwayPeriod {
        AwayPeriod {
            id,
            start_time: Some(start),
            end_time: end,
            duration_seconds: end.map_or(0.0, |e| (e - start) as f64),
            trigger_type: "idle_timeout".into(),
        }
    }

    #[test]
    fn empty_day_is_zeroed() {
        let stats = day_stats(&[], &[], DAY, NOW);
        assert_eq!(stats, DayStats::default());
    }

    #[test]
    fn active_time_is_span_minus_away() {
        let activities = [activity(1, 1_000, 2_000), activity(2, 3_000, 5_000)];
        let away_periods = [away(1, 2_000, Some(3_000)), away(2, 6_000, None)];

        let stats = day_stats(&activities, &away_periods, DAY, NOW);

        assert_eq!(stats.day_span, Some(TimeSpan::new(1_000, 5_000)));
        assert_eq!(stats.total_active_secs, 3_000);
        assert_eq!(stats.away_count, 1);
        assert_eq!(stats.away_secs, 1_000);
    }

    #[test]
    fn breaks_are_gaps_between_one_minute_and_two_hours() {
        let activities = [
            activity(1, 0, 100),
            activity(2, 130, 200),
            activity(3, 500, 600),
            activity(4, 9_000, 9_100),
        ];
        let stats = day_stats(&activities, &[], DAY, NOW);
        assert_eq!(stats.break_count, 1);
        assert_eq!(stats.break_secs, 300);
    }

    #[test]
    fn longest_focus_survives_short_gaps() {
        let activities = [
            activity(1, 0, 600),
            activity(2, 700, 1_300),
            activity(3, 5_000, 5_900),
        ];
        let stats = day_stats(&activities, &[], DAY, NOW);
        assert_eq!(stats.longest_focus_secs, 1_200);
        assert_eq!(stats.longest_focus_start, Some(0));
        assert_eq!(stats.longest_focus_end, Some(1_300));
    }

    #[test]
    fn activities_during_away_time_are_ignored() {
        let activities = [activity(1, 0, 600), activity(2, 1_000, 1_200)];
        let stats = day_stats(&activities, &[away(1, 900, Some(1_500))], DAY, NOW);
        assert_eq!(stats.day_span, Some(TimeSpan::new(0, 600)));
        assert_eq!(stats.total_active_secs, 600);
    }

    #[test]
    fn breakdown_is_scaled_to_active_time_and_carries_breaks() {
        // Overlapping readings: raw category time (3_000 + 1_000) exceeds the span.
        let activities = [
            app_activity(1, 0, 3_000, "Code", "focus"),
            app_activity(2, 2_000, 3_000, "Zoom", "meetings"),
            app_activity(3, 3_600, 4_000, "Slack", ""),
        ];
        let stats = day_stats(&activities, &[], DAY, NOW);

        assert_eq!(stats.total_active_secs, 4_000);
        assert_eq!(stats.break_secs, 600);
        let b = &stats.breakdown;
        let active: f64 = b.iter().filter(|(k, _)| k.as_str() != "breaks").map(|(_, v)| v).sum();
        assert!((active - 4_000.0).abs() < 1e-6);
        assert!((b["focus"] - 3_000.0 * 4_000.0 / 4_400.0).abs() < 1e-6);
        assert!((b["other"] - 400.0 * 4_000.0 / 4_400.0).abs() < 1e-6);
        assert_eq!(b["comms"], 0.0);
        assert_eq!(b["breaks"], 600.0);

        let pct = &stats.breakdown_percent;
        let total_pct: f64 = pct.values().sum();
        assert!((total_pct - 100.0).abs() < 1e-6);
        assert!((pct["breaks"] - 600.0 / 4_600.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn breakdown_without_focus_time_has_no_percentages() {
        let activities = [activity(1, 1_000, 1_200)];
        let stats = day_stats(&activities, &[away(1, 900, Some(1_500))], DAY, NOW);
        assert_eq!(stats.breakdown["focus"], 0.0);
        assert_eq!(stats.breakdown["breaks"], 0.0);
        assert!(stats.breakdown_percent.is_empty());
    }

    #[test]
    fn time_since_last_break_needs_a_finished_away_period() {
        let activities = [activity(1, 1_000, 2_000)];
        assert_eq!(day_stats(&activities, &[], DAY, NOW).time_since_last_break, None);
        let ongoing = [away(1, 3_000, None)];
        assert_eq!(day_stats(&activities, &ongoing, DAY, NOW).time_since_last_break, None);
    }

    #[test]
    fn time_since_last_break_on_a_past_day_runs_to_midnight() {
        let activities = [activity(1, 1_000, 2_000)];
        let away_periods = [away(1, 2_000, Some(3_000)), away(2, 40_000, Some(50_000))];
        let stats = day_stats(&activities, &away_periods, DAY, NOW);
        assert_eq!(stats.time_since_last_break, Some(86_400 - 50_000));
    }

    #[test]
    fn time_since_last_break_today_runs_to_now() {
        let activities = [activity(1, 1_000, 2_000)];
        let away_periods = [away(1, 2_000, Some(3_000))];
        let stats = day_stats(&activities, &away_periods, DAY, 5_000);
        assert_eq!(stats.time_since_last_break, Some(2_000));

        // A clock behind the recorded break never goes negative.
        let stats = day_stats(&activities, &away_periods, DAY, 2_500);
        assert_eq!(stats.time_since_last_break, Some(0));
    }

    #[test]
    fn top_apps_merge_case_insensitively_and_keep_six() {
        let mut activities = vec![
            app_activity(1, 0, 100, "Code", ""),
            app_activity(2, 200, 400, "code", "focus"),
        ];
        for (i, app) in ["Slack", "Zoom", "Mail", "Notes", "Music", "Chess"].iter().enumerate() {
            let start = 1_000 + i as i64 * 1_000;
            activities.push(app_activity(10 + i as i64, start, start + 250 - i as i64 * 10, app, "comms"));
        }
        let stats = day_stats(&activities, &[], DAY, NOW);

        assert_eq!(stats.top_apps.len(), TOP_APP_COUNT);
        assert_eq!(
            stats.top_apps[0],
            TopApp {
                app_name: "Code".into(),
                duration_secs: 300,
                category: "focus".into(),
            }
        );
        let names: Vec<&str> = stats.top_apps.iter().map(|a| a.app_name.as_str()).collect();
        assert_eq!(names, vec!["Code", "Slack", "Zoom", "Mail", "Notes", "Music"]);
    }

    #[test]
    fn top_apps_default_to_other_category() {
        let activities = [app_activity(1, 0, 100, "Terminal", "  ")];
        let stats = day_stats(&activities, &[], DAY, NOW);
        assert_eq!(stats.top_apps[0].category, "other");
        assert_eq!(stats.breakdown["other"], 100.0);
    }
}
