//! Event normalizer: maps every raw source record onto a [`NormalizedDot`].
//!
//! Records missing a required field produce no dot; the rest of the day is
//! still normalized.

pub mod colors;

use std::collections::HashSet;

use crate::models::{DayBundle, DotType, EventFilters, NormalizedDot, RawEvent};
use crate::{log_debug, log_warn};

pub use colors::{app_color, type_color, DEFAULT_APP_COLOR};

const ENABLE_LOGS: bool = true;

/// Label used for browser visits whose page had no title.
pub const UNTITLED_PAGE: &str = "(No title)";

/// Normalize every record of every enabled source in `bundle`.
pub fn normalize(bundle: &DayBundle, filters: &EventFilters) -> Vec<NormalizedDot> {
    let events = bundle.events(filters);
    let mut seen = HashSet::with_capacity(events.len());
    let mut dots = Vec::with_capacity(events.len());
    let mut skipped = 0usize;

    for event in events {
        let Some(dot) = normalize_event(event) else {
            skipped += 1;
            continue;
        };
        if !seen.insert(dot.id.clone()) {
            log_warn!("dropping duplicate record {}", dot.id);
            skipped += 1;
            continue;
        }
        dots.push(dot);
    }

    log_debug!("normalized {} dots ({} records skipped)", dots.len(), skipped);
    dots
}

/// Normalize one record, or `None` when a required field is missing.
pub fn normalize_event(event: RawEvent<'_>) -> Option<NormalizedDot> {
    let dot_type = dot_type_of(event);
    let Some(timestamp) = event.timestamp() else {
        log_warn!("{}-{} has no timestamp", dot_type, event.original_id());
        return None;
    };
    let Some(label) = label_for(event) else {
        log_warn!("{}-{} has no usable label", dot_type, event.original_id());
        return None;
    };
    let row_key = row_key_for(event)?;

    let color = match event {
        RawEvent::Activity(_) => app_color(&row_key),
        _ => type_color(dot_type),
    };

    Some(NormalizedDot {
        id: format!("{}-{}", dot_type.as_str(), event.original_id()),
        original_id: event.original_id(),
        timestamp,
        dot_type,
        row_key,
        label,
        duration_seconds: event.duration_seconds(),
        color: color.to_string(),
    })
}

pub fn dot_type_of(event: RawEvent<'_>) -> DotType {
    match event {
        RawEvent::Activity(_) => DotType::Activity,
        RawEvent::Commit(_) => DotType::Git,
        RawEvent::ShellCommand(_) => DotType::Shell,
        RawEvent::BrowserVisit(_) => DotType::Browser,
        RawEvent::File(_) => DotType::File,
        RawEvent::AwayPeriod(_) => DotType::Afk,
        RawEvent::Screenshot(_) => DotType::Screenshot,
    }
}

/// App name for activities, the fixed lane name for everything else.
pub fn row_key_for(event: RawEvent<'_>) -> Option<String> {
    match event {
        RawEvent::Activity(activity) => non_empty(activity.app_name.as_deref()).map(str::to_string),
        other => dot_type_of(other).lane().map(str::to_string),
    }
}

/// Human-readable label for a record.
pub fn label_for(event: RawEvent<'_>) -> Option<String> {
    let label = match event {
        RawEvent::Activity(activity) => {
            let app_name = non_empty(activity.app_name.as_deref())?;
            non_empty(Some(activity.window_title.as_str())).unwrap_or(app_name)
        }
        RawEvent::Commit(commit) => non_empty(commit.subject())?,
        RawEvent::ShellCommand(command) => non_empty(command.command.as_deref())?,
        RawEvent::BrowserVisit(visit) => {
            non_empty(Some(visit.title.as_str())).unwrap_or(UNTITLED_PAGE)
        }
        RawEvent::File(file) => file.display_name()?,
        RawEvent::AwayPeriod(away) => {
            // Still in progress; nothing to draw yet.
            away.end_time?;
            away_label(&away.trigger_type)
        }
        RawEvent::Screenshot(shot) => non_empty(Some(shot.window_title.as_str()))
            .or_else(|| non_empty(Some(shot.app_name.as_str())))
            .unwrap_or("Screenshot"),
    };
    Some(label.to_string())
}

fn away_label(trigger_type: &str) -> &'static str {
    match trigger_type {
        "idle_timeout" => "Idle",
        "system_sleep" => "Asleep",
        _ => "Away",
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
