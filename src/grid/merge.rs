//! Optional consolidation of activity dots before they hit the grid.

use std::collections::HashMap;

use crate::log_debug;
use crate::models::{DotType, NormalizedDot};

const ENABLE_LOGS: bool = false;

/// Merge activity dots of the same app that follow each other within
/// `gap_tolerance_secs`.
///
/// The merged dot keeps the id, label and colour of the earliest member and
/// stretches to the latest member's end. Apps are matched case-insensitively.
/// Other dot types pass through untouched. Output is ordered by timestamp.
pub fn merge_consecutive(dots: &[NormalizedDot], gap_tolerance_secs: i64) -> Vec<NormalizedDot> {
    let mut by_app: HashMap<String, Vec<&NormalizedDot>> = HashMap::new();
    let mut result: Vec<NormalizedDot> = Vec::with_capacity(dots.len());

    for dot in dots {
        if dot.dot_type == DotType::Activity {
            by_app.entry(dot.row_key.to_lowercase()).or_default().push(dot);
        } else {
            result.push(dot.clone());
        }
    }

    let mut merged_away = 0usize;
    for (_, mut app_dots) in by_app {
        app_dots.sort_by_key(|dot| dot.timestamp);

        let mut current: Option<NormalizedDot> = None;
        for dot in app_dots {
            let continues = current
                .as_ref()
                .is_some_and(|open| dot.timestamp - dot_end(open) <= gap_tolerance_secs);
            if let (true, Some(open)) = (continues, current.as_mut()) {
                let end = dot_end(open).max(dot_end(dot));
                open.duration_seconds = Some((end - open.timestamp) as f64);
                merged_away += 1;
            } else if let Some(done) = current.replace(dot.clone()) {
                result.push(done);
            }
        }
        if let Some(done) = current {
            result.push(done);
        }
    }

    result.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    log_debug!("merged {} activity dots into their predecessors", merged_away);
    result
}

/// Drop activity dots shorter than `min_secs`. Other dot types are kept.
pub fn drop_short_activities(dots: Vec<NormalizedDot>, min_secs: i64) -> Vec<NormalizedDot> {
    if min_secs <= 0 {
        return dots;
    }
    dots.into_iter()
        .filter(|dot| {
            dot.dot_type != DotType::Activity
                || dot.duration_seconds.unwrap_or(0.0) >= min_secs as f64
        })
        .collect()
}

fn dot_end(dot: &NormalizedDot) -> i64 {
    dot.timestamp + dot.duration_seconds.unwrap_or(0.0).max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(id: i64, dot_type: DotType, row_key: &str, timestamp: i64, secs: f64) -> NormalizedDot {
        NormalizedDot {
            id: format!("{}-{id}", dot_type.as_str()),
            original_id: id,
            timestamp,
            dot_type,
            row_key: row_key.to_string(),
            label: format!("{row_key} {id}"),
            duration_seconds: Some(secs),
            color: "#000000".into(),
        }
    }

    fn activity(id: i64, app: &str, start: i64, secs: f64) -> NormalizedDot {
        dot(id, DotType::Activity, app, start, secs)
    }

    #[test]
    fn neighbours_within_tolerance_merge() {
        let dots = vec![
            activity(1, "Code", 0, 100.0),
            activity(2, "Code", 130, 70.0),
            activity(3, "Code", 1_000, 60.0),
        ];
        let merged = merge_consecutive(&dots, 60);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "activity-1");
        assert_eq!(merged[0].duration_seconds, Some(200.0));
        assert_eq!(merged[1].id, "activity-3");
    }

    #[test]
    fn apps_never_merge_across_each_other() {
        let dots = vec![
            activity(1, "Code", 0, 100.0),
            activity(2, "Slack", 100, 50.0),
            activity(3, "code", 150, 50.0),
        ];
        let merged = merge_consecutive(&dots, 60);
        let ids: Vec<&str> = merged.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["activity-1", "activity-2"]);
        assert_eq!(merged[0].duration_seconds, Some(200.0));
    }

    #[test]
    fn contained_member_does_not_shrink_the_merge() {
        let dots = vec![activity(1, "Code", 0, 600.0), activity(2, "Code", 100, 10.0)];
        let merged = merge_consecutive(&dots, 0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].duration_seconds, Some(600.0));
    }

    #[test]
    fn other_types_pass_through() {
        let dots = vec![
            dot(1, DotType::Git, "Git", 10, 0.0),
            activity(2, "Code", 0, 5.0),
            dot(3, DotType::Shell, "Shell", 12, 1.0),
        ];
        let merged = merge_consecutive(&dots, 3_600);
        let ids: Vec<&str> = merged.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["activity-2", "git-1", "shell-3"]);
    }

    #[test]
    fn short_activities_are_dropped() {
        let dots = vec![
            activity(1, "Code", 0, 30.0),
            activity(2, "Code", 100, 90.0),
            dot(3, DotType::Git, "Git", 5, 0.0),
        ];
        let kept = drop_short_activities(dots.clone(), 60);
        let ids: Vec<&str> = kept.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["activity-2", "git-3"]);

        assert_eq!(drop_short_activities(dots, 0).len(), 3);
    }
}
