//! Day render model: every transform of the crate applied to one day bundle.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::clustering::{cluster_commits, cluster_shell_commands, ClusterMember, ClusteredGroup};
use crate::grid::{drop_short_activities, merge_consecutive, position, GridLayout, Positioned};
use crate::inference::{away_spans, day_stats, infer_activity, ActivityInterval, DayStats};
use crate::log_debug;
use crate::models::{Activity, AwayPeriod, Commit, DayBundle, NormalizedDot, ShellCommand, TimeSpan};
use crate::normalize::normalize;
use crate::rows::aggregate;
use crate::settings::Settings;

const ENABLE_LOGS: bool = true;

const UNBOUNDED: TimeSpan = TimeSpan {
    start: i64::MIN,
    end: i64::MAX,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionedRow {
    pub name: String,
    pub dot_count: usize,
    pub dots: Vec<Positioned<NormalizedDot>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: Option<NaiveDate>,
    /// Calendar bounds of `date` in the viewer's time zone.
    pub bounds: Option<TimeSpan>,
    pub layout: GridLayout,
    pub grid_height: f64,
    pub rows: Vec<PositionedRow>,
    pub commit_clusters: Vec<Positioned<ClusteredGroup<Commit>>>,
    pub shell_clusters: Vec<Positioned<ClusteredGroup<ShellCommand>>>,
    pub activity_intervals: Vec<Positioned<ActivityInterval>>,
    pub stats: DayStats,
}

/// Build the grid model for `bundle` as seen from `tz`.
///
/// With a `date`, everything is clipped to that local calendar day first.
/// Source toggles decide which dots and clusters are drawn; statistics and
/// inferred activity always use every record of the day. `now` is the
/// current epoch second.
pub fn build_day_view<Tz: TimeZone>(bundle: &DayBundle, settings: &Settings, tz: &Tz, now: i64) -> DayView {
    let layout = settings.layout;
    let bounds = bundle.date.and_then(|date| TimeSpan::calendar_day(date, tz));
    let day = match &bounds {
        Some(bounds) => bundle.clipped_to(bounds),
        None => bundle.clone(),
    };

    let mut dots = normalize(&day, &settings.filters);
    if settings.grouping.enabled {
        dots = drop_short_activities(dots, settings.grouping.min_duration_secs);
        dots = merge_consecutive(&dots, settings.grouping.continuity_merge_secs);
    }

    let rows: Vec<PositionedRow> = aggregate(&dots)
        .into_iter()
        .map(|row| PositionedRow {
            name: row.name,
            dot_count: row.dot_count,
            dots: row
                .dots
                .into_iter()
                .filter_map(|dot| {
                    let pos = position(dot.timestamp, dot.duration_seconds.unwrap_or(0.0), &layout, tz)?;
                    Some(Positioned::new(dot, pos))
                })
                .collect(),
        })
        .collect();

    let commit_clusters = if settings.filters.commit {
        let commits: Vec<Commit> = day.commits.iter().cloned().collect();
        place_clusters(cluster_commits(&commits, &settings.clustering), &layout, tz)
    } else {
        Vec::new()
    };
    let shell_clusters = if settings.filters.shell_command {
        let commands: Vec<ShellCommand> = day.shell_commands.iter().cloned().collect();
        place_clusters(cluster_shell_commands(&commands, &settings.clustering), &layout, tz)
    } else {
        Vec::new()
    };

    let activities: Vec<Activity> = day.activities.iter().cloned().collect();
    let away: Vec<AwayPeriod> = day.away_periods.iter().cloned().collect();
    let stats = day_stats(&activities, &away, bounds.unwrap_or(UNBOUNDED), now);

    let activity_intervals: Vec<Positioned<ActivityInterval>> = stats
        .day_span
        .or(bounds)
        .map(|span| infer_activity(span, &away_spans(&away), settings.inference.min_activity_secs))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|interval| {
            let pos = position(interval.start_time, interval.duration_seconds as f64, &layout, tz)?;
            Some(Positioned::new(interval, pos))
        })
        .collect();

    log_debug!(
        "day view: {} rows, {} commit clusters, {} shell clusters, {} activity intervals",
        rows.len(),
        commit_clusters.len(),
        shell_clusters.len(),
        activity_intervals.len()
    );

    DayView {
        date: bundle.date,
        bounds,
        layout,
        grid_height: layout.grid_height(),
        rows,
        commit_clusters,
        shell_clusters,
        activity_intervals,
        stats,
    }
}

fn place_clusters<E: ClusterMember, Tz: TimeZone>(
    groups: Vec<ClusteredGroup<E>>,
    layout: &GridLayout,
    tz: &Tz,
) -> Vec<Positioned<ClusteredGroup<E>>> {
    groups
        .into_iter()
        .filter_map(|group| {
            let pos = position(group.start_timestamp, group.span_secs() as f64, layout, tz)?;
            Some(Positioned::new(group, pos))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GroupingSettings;
    use chrono::Utc;

    // 2025-03-14T00:00:00Z
    const MIDNIGHT: i64 = 1_741_910_400;

    fn at(hour: i64, minute: i64) -> i64 {
        MIDNIGHT + hour * 3600 + minute * 60
    }

    const NOW: i64 = MIDNIGHT + 3 * 86_400;

    fn bundle() -> DayBundle {
        let json = format!(
            r#"{{
                "date": "2025-03-14",
                "activities": {{
                    "9": [
                        {{"id": 1, "startTime": {a1}, "endTime": {a1e}, "durationSeconds": 3600, "appName": "code", "windowTitle": "lib.rs"}},
                        {{"id": 2, "startTime": {a2}, "endTime": {a2e}, "durationSeconds": 1800, "appName": "Code", "windowTitle": "view.rs"}}
                    ],
                    "23": [
                        {{"id": 3, "startTime": {a3}, "endTime": {a3e}, "durationSeconds": 7200, "appName": "Firefox"}}
                    ]
                }},
                "awayPeriods": [
                    {{"id": 4, "startTime": {w}, "endTime": {we}, "durationSeconds": 1800, "triggerType": "idle_timeout"}}
                ],
                "shellCommands": [
                    {{"id": 5, "timestamp": {s1}, "command": "cargo fmt", "exitCode": 0}},
                    {{"id": 6, "timestamp": {s2}, "command": "cargo clippy", "exitCode": 1}},
                    {{"id": 7, "timestamp": {s3}, "command": "git push", "exitCode": 0}}
                ],
                "commits": [
                    {{"id": 8, "timestamp": {c1}, "message": "Add view", "branch": "main", "insertions": 40, "deletions": 2}}
                ]
            }}"#,
            a1 = at(9, 0),
            a1e = at(10, 0),
            a2 = at(10, 30),
            a2e = at(11, 0),
            a3 = at(23, 0),
            a3e = at(25, 0),
            w = at(10, 0),
            we = at(10, 30),
            s1 = at(9, 10),
            s2 = at(9, 12),
            s3 = at(14, 0),
            c1 = at(9, 15),
        );
        DayBundle::from_json(&json).unwrap()
    }

    #[test]
    fn rows_are_merged_and_positioned() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);

        let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Code", "Firefox", "Git", "Shell", "Breaks"]);

        let code = &view.rows[0];
        assert_eq!(code.dot_count, 2);
        let layout = GridLayout::default();
        assert_eq!(code.dots[0].top, layout.header_height + 9.0 * layout.pixels_per_hour);
        assert_eq!(code.dots[0].height, layout.pixels_per_hour);
    }

    #[test]
    fn activities_are_clipped_to_the_calendar_day() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);
        let firefox = &view.rows[1];
        assert_eq!(firefox.dots[0].item.duration_seconds, Some(3600.0));
        assert_eq!(view.bounds, Some(TimeSpan::new(MIDNIGHT, MIDNIGHT + 86_400)));
    }

    #[test]
    fn clusters_follow_thresholds_and_toggles() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);
        assert_eq!(view.shell_clusters.len(), 2);
        assert_eq!(view.shell_clusters[0].item.merged_count, 2);
        assert_eq!(view.shell_clusters[0].item.summary.failure_count, 1);
        assert_eq!(view.commit_clusters.len(), 1);

        let mut settings = Settings::default();
        settings.filters.shell_command = false;
        let view = build_day_view(&bundle(), &settings, &Utc, NOW);
        assert!(view.shell_clusters.is_empty());
        assert!(view.rows.iter().all(|r| r.name != "Shell"));
    }

    #[test]
    fn activity_intervals_span_first_to_last_activity() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);
        let spans: Vec<(i64, i64)> = view
            .activity_intervals
            .iter()
            .map(|p| (p.item.start_time, p.item.end_time))
            .collect();
        assert_eq!(
            spans,
            vec![(at(9, 0), at(10, 0)), (at(10, 30), MIDNIGHT + 86_400)]
        );
        assert_eq!(view.stats.away_count, 1);
    }

    #[test]
    fn stats_carry_top_apps_and_time_since_break() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);
        let apps: Vec<(&str, i64)> = view
            .stats
            .top_apps
            .iter()
            .map(|a| (a.app_name.as_str(), a.duration_secs))
            .collect();
        assert_eq!(apps, vec![("code", 5_400), ("Firefox", 3_600)]);
        assert_eq!(view.stats.time_since_last_break, Some(MIDNIGHT + 86_400 - at(10, 30)));
        assert!(view.stats.breakdown.contains_key("breaks"));
    }

    #[test]
    fn grouping_merges_same_app_blocks() {
        let mut settings = Settings::default();
        settings.grouping = GroupingSettings {
            enabled: true,
            continuity_merge_secs: 1800,
            min_duration_secs: 0,
        };
        let view = build_day_view(&bundle(), &settings, &Utc, NOW);
        let code = &view.rows[0];
        assert_eq!(code.dot_count, 1);
        assert_eq!(code.dots[0].item.duration_seconds, Some(7200.0));
    }

    #[test]
    fn empty_bundle_gives_empty_view() {
        let view = build_day_view(&DayBundle::default(), &Settings::default(), &Utc, NOW);
        assert!(view.rows.is_empty());
        assert!(view.activity_intervals.is_empty());
        assert_eq!(view.stats, DayStats::default());
    }

    #[test]
    fn serializes_positions_inline() {
        let view = build_day_view(&bundle(), &Settings::default(), &Utc, NOW);
        let json = serde_json::to_value(&view).unwrap();
        let dot = &json["rows"][0]["dots"][0];
        assert_eq!(dot["type"], "activity");
        assert!(dot["top"].is_number());
        assert_eq!(json["shellClusters"][0]["successCount"], 1);
    }
}
