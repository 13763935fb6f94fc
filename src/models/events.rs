//! Raw per-source event records as delivered by the data-fetching layer.
//!
//! Fields the timeline cannot do without (timestamps, app names, command text)
//! are `Option` so that a partially populated record still deserializes; the
//! normalizer drops such records instead of failing the whole day.

use serde::{Deserialize, Serialize};

/// A window-focus interval for one application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub window_title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub project: Option<String>,
}

impl Activity {
    /// End of the interval, falling back to `start + duration` when the
    /// source did not record an end time.
    pub fn effective_end(&self) -> Option<i64> {
        let start = self.start_time?;
        Some(
            self.end_time
                .unwrap_or(start + self.duration_seconds.max(0.0) as i64),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub short_hash: String,
    #[serde(default)]
    pub insertions: i64,
    #[serde(default)]
    pub deletions: i64,
}

impl Commit {
    /// First line of the commit message.
    pub fn subject(&self) -> Option<&str> {
        let message = self.message.as_deref()?;
        Some(message.lines().next().unwrap_or(message).trim_end())
    }

    pub fn repository_name(&self) -> &str {
        match self.repository.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }

    pub fn branch_name(&self) -> &str {
        match self.branch.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "main",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellCommand {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub working_directory: String,
    #[serde(default)]
    pub exit_code: i64,
    #[serde(default)]
    pub shell_type: String,
}

impl ShellCommand {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserVisit {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub visit_duration_seconds: i64,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub url: String,
}

/// A file system change inside a watched directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileEvent {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// create, modify, delete or rename
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub directory: String,
    #[serde(default)]
    pub old_path: Option<String>,
}

impl FileEvent {
    /// File name, derived from the path when the source left it blank.
    pub fn display_name(&self) -> Option<&str> {
        if !self.file_name.is_empty() {
            return Some(&self.file_name);
        }
        let path = self.file_path.as_deref()?;
        path.rsplit(['/', '\\']).find(|part| !part.is_empty())
    }
}

/// Idle or sleep period. Ongoing periods carry no end time and are skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwayPeriod {
    pub id: i64,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub duration_seconds: f64,
    /// idle_timeout, system_sleep or manual
    #[serde(default)]
    pub trigger_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub window_title: String,
}

/// Borrowed view over one record of any source, so every consumer matches
/// exhaustively on the source instead of probing fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent<'a> {
    Activity(&'a Activity),
    Commit(&'a Commit),
    ShellCommand(&'a ShellCommand),
    BrowserVisit(&'a BrowserVisit),
    File(&'a FileEvent),
    AwayPeriod(&'a AwayPeriod),
    Screenshot(&'a Screenshot),
}

impl RawEvent<'_> {
    pub fn original_id(&self) -> i64 {
        match self {
            RawEvent::Activity(e) => e.id,
            RawEvent::Commit(e) => e.id,
            RawEvent::ShellCommand(e) => e.id,
            RawEvent::BrowserVisit(e) => e.id,
            RawEvent::File(e) => e.id,
            RawEvent::AwayPeriod(e) => e.id,
            RawEvent::Screenshot(e) => e.id,
        }
    }

    /// Start or occurrence time of the record.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            RawEvent::Activity(e) => e.start_time,
            RawEvent::Commit(e) => e.timestamp,
            RawEvent::ShellCommand(e) => e.timestamp,
            RawEvent::BrowserVisit(e) => e.timestamp,
            RawEvent::File(e) => e.timestamp,
            RawEvent::AwayPeriod(e) => e.start_time,
            RawEvent::Screenshot(e) => e.timestamp,
        }
    }

    /// Duration for interval-like sources; point events have none.
    pub fn duration_seconds(&self) -> Option<f64> {
        match self {
            RawEvent::Activity(e) => Some(e.duration_seconds.max(0.0)),
            RawEvent::ShellCommand(e) => Some(e.duration_seconds.max(0.0)),
            RawEvent::BrowserVisit(e) => Some(e.visit_duration_seconds.max(0) as f64),
            RawEvent::AwayPeriod(e) => Some(e.duration_seconds.max(0.0)),
            RawEvent::Commit(_) | RawEvent::File(_) | RawEvent::Screenshot(_) => None,
        }
    }
}
