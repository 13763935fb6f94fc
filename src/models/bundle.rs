//! Per-day bundle of raw collections and the per-source inclusion toggles.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::dot::DotType;
use crate::models::events::{
    Activity, AwayPeriod, BrowserVisit, Commit, FileEvent, RawEvent, Screenshot, ShellCommand,
};
use crate::models::span::TimeSpan;
use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;

/// A source collection, either flat or bucketed by hour-of-day as the grid
/// endpoints deliver it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventCollection<T> {
    Flat(Vec<T>),
    Hourly(BTreeMap<u32, Vec<T>>),
}

impl<T> Default for EventCollection<T> {
    fn default() -> Self {
        EventCollection::Flat(Vec::new())
    }
}

impl<T> From<Vec<T>> for EventCollection<T> {
    fn from(items: Vec<T>) -> Self {
        EventCollection::Flat(items)
    }
}

impl<T> EventCollection<T> {
    /// Records in ascending hour order for hourly collections, input order otherwise.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            EventCollection::Flat(items) => Box::new(items.iter()),
            EventCollection::Hourly(hours) => Box::new(hours.values().flatten()),
        }
    }

    pub fn into_flat(self) -> Vec<T> {
        match self {
            EventCollection::Flat(items) => items,
            EventCollection::Hourly(hours) => hours.into_values().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EventCollection::Flat(items) => items.len(),
            EventCollection::Hourly(hours) => hours.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-source inclusion toggles. A disabled source contributes nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFilters {
    pub activity: bool,
    pub commit: bool,
    pub shell_command: bool,
    pub browser_visit: bool,
    pub file_event: bool,
    pub away_period: bool,
    pub screenshot: bool,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            activity: true,
            commit: true,
            shell_command: true,
            browser_visit: true,
            file_event: true,
            away_period: true,
            screenshot: true,
        }
    }
}

impl EventFilters {
    pub fn allows(&self, dot_type: DotType) -> bool {
        match dot_type {
            DotType::Activity => self.activity,
            DotType::Git => self.commit,
            DotType::Shell => self.shell_command,
            DotType::Browser => self.browser_visit,
            DotType::File => self.file_event,
            DotType::Afk => self.away_period,
            DotType::Screenshot => self.screenshot,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DayBundle {
    pub date: Option<NaiveDate>,
    pub activities: EventCollection<Activity>,
    pub commits: EventCollection<Commit>,
    pub shell_commands: EventCollection<ShellCommand>,
    pub browser_visits: EventCollection<BrowserVisit>,
    pub file_events: EventCollection<FileEvent>,
    pub away_periods: EventCollection<AwayPeriod>,
    pub screenshots: EventCollection<Screenshot>,
}

impl DayBundle {
    /// Parse a bundle, skipping individual records that fail to deserialize.
    pub fn from_json(input: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(input).context("day bundle is not valid JSON")?;
        let Value::Object(fields) = &root else {
            bail!("day bundle must be a JSON object");
        };

        let date = match fields.get("date") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<NaiveDate>(value.clone())
                    .context("day bundle date must be YYYY-MM-DD")?,
            ),
        };

        Ok(Self {
            date,
            activities: lenient_collection(fields.get("activities"), "activities")?,
            commits: lenient_collection(fields.get("commits"), "commits")?,
            shell_commands: lenient_collection(fields.get("shellCommands"), "shellCommands")?,
            browser_visits: lenient_collection(fields.get("browserVisits"), "browserVisits")?,
            file_events: lenient_collection(fields.get("fileEvents"), "fileEvents")?,
            away_periods: lenient_collection(fields.get("awayPeriods"), "awayPeriods")?,
            screenshots: lenient_collection(fields.get("screenshots"), "screenshots")?,
        })
    }

    /// Every record of every enabled source, sources in lane order.
    pub fn events(&self, filters: &EventFilters) -> Vec<RawEvent<'_>> {
        let mut events = Vec::new();
        if filters.activity {
            events.extend(self.activities.iter().map(RawEvent::Activity));
        }
        if filters.commit {
            events.extend(self.commits.iter().map(RawEvent::Commit));
        }
        if filters.shell_command {
            events.extend(self.shell_commands.iter().map(RawEvent::ShellCommand));
        }
        if filters.browser_visit {
            events.extend(self.browser_visits.iter().map(RawEvent::BrowserVisit));
        }
        if filters.file_event {
            events.extend(self.file_events.iter().map(RawEvent::File));
        }
        if filters.away_period {
            events.extend(self.away_periods.iter().map(RawEvent::AwayPeriod));
        }
        if filters.screenshot {
            events.extend(self.screenshots.iter().map(RawEvent::Screenshot));
        }
        events
    }

    /// Copy of the bundle restricted to `bounds`.
    ///
    /// Intervals are clipped and re-measured; intervals and point events that
    /// fall entirely outside are dropped, as are away periods still in progress.
    pub fn clipped_to(&self, bounds: &TimeSpan) -> DayBundle {
        let activities: Vec<Activity> = self
            .activities
            .iter()
            .filter_map(|activity| {
                let (Some(start), Some(end)) = (activity.start_time, activity.effective_end())
                else {
                    // Left for the normalizer to reject.
                    return Some(activity.clone());
                };
                let clipped = TimeSpan::new(start, end).clip_to(bounds)?;
                Some(Activity {
                    start_time: Some(clipped.start),
                    end_time: Some(clipped.end),
                    duration_seconds: clipped.duration_secs() as f64,
                    ..activity.clone()
                })
            })
            .collect();

        let away_periods: Vec<AwayPeriod> = self
            .away_periods
            .iter()
            .filter_map(|away| {
                let clipped = TimeSpan::new(away.start_time?, away.end_time?).clip_to(bounds)?;
                Some(AwayPeriod {
                    start_time: Some(clipped.start),
                    end_time: Some(clipped.end),
                    duration_seconds: clipped.duration_secs() as f64,
                    ..away.clone()
                })
            })
            .collect();

        let clipped = DayBundle {
            date: self.date,
            activities: activities.into(),
            commits: keep_within(&self.commits, bounds, |c| c.timestamp),
            shell_commands: keep_within(&self.shell_commands, bounds, |c| c.timestamp),
            browser_visits: keep_within(&self.browser_visits, bounds, |v| v.timestamp),
            file_events: keep_within(&self.file_events, bounds, |f| f.timestamp),
            away_periods: away_periods.into(),
            screenshots: keep_within(&self.screenshots, bounds, |s| s.timestamp),
        };
        log_debug!(
            "clipped bundle to [{}, {}): {} activities, {} away periods",
            bounds.start,
            bounds.end,
            clipped.activities.len(),
            clipped.away_periods.len()
        );
        clipped
    }
}

fn keep_within<T: Clone>(
    collection: &EventCollection<T>,
    bounds: &TimeSpan,
    timestamp: impl Fn(&T) -> Option<i64>,
) -> EventCollection<T> {
    collection
        .iter()
        .filter(|item| match timestamp(item) {
            Some(ts) => ts >= bounds.start && ts < bounds.end,
            None => true,
        })
        .cloned()
        .collect::<Vec<_>>()
        .into()
}

fn lenient_collection<T: DeserializeOwned>(
    value: Option<&Value>,
    source: &str,
) -> Result<EventCollection<T>> {
    match value {
        None | Some(Value::Null) => Ok(EventCollection::default()),
        Some(Value::Array(items)) => Ok(EventCollection::Flat(lenient_records(items, source))),
        Some(Value::Object(hours)) => {
            let mut buckets = BTreeMap::new();
            for (hour, items) in hours {
                let Ok(hour) = hour.parse::<u32>() else {
                    log_warn!("skipping {source} bucket with non-numeric hour {hour:?}");
                    continue;
                };
                let Value::Array(items) = items else {
                    log_warn!("skipping {source} bucket for hour {hour}: not an array");
                    continue;
                };
                buckets.insert(hour, lenient_records(items, source));
            }
            Ok(EventCollection::Hourly(buckets))
        }
        Some(_) => bail!("{source} must be an array or an hour-keyed object"),
    }
}

fn lenient_records<T: DeserializeOwned>(items: &[Value], source: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(err) => {
                log_warn!("skipping malformed {source} record #{index}: {err}");
                None
            }
        })
        .collect()
}
