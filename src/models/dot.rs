//! Common positional record every source is normalized into.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DotType {
    Activity,
    Git,
    Shell,
    Browser,
    File,
    Afk,
    Screenshot,
}

impl DotType {
    pub const ALL: [DotType; 7] = [
        DotType::Activity,
        DotType::Git,
        DotType::Shell,
        DotType::Browser,
        DotType::File,
        DotType::Afk,
        DotType::Screenshot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DotType::Activity => "activity",
            DotType::Git => "git",
            DotType::Shell => "shell",
            DotType::Browser => "browser",
            DotType::File => "file",
            DotType::Afk => "afk",
            DotType::Screenshot => "screenshot",
        }
    }

    /// Fixed lane for the non-application sources. Activities are laned by app.
    pub fn lane(&self) -> Option<&'static str> {
        match self {
            DotType::Activity => None,
            DotType::Git => Some("Git"),
            DotType::Shell => Some("Shell"),
            DotType::Browser => Some("Browser"),
            DotType::File => Some("Files"),
            DotType::Afk => Some("Breaks"),
            DotType::Screenshot => Some("Screenshots"),
        }
    }
}

impl fmt::Display for DotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match DotType::ALL.iter().find(|t| t.as_str() == value) {
            Some(t) => Ok(*t),
            None => bail!("unknown event type {value}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDot {
    /// `<type>-<originalId>`, unique within one day.
    pub id: String,
    pub original_id: i64,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub dot_type: DotType,
    pub row_key: String,
    pub label: String,
    pub duration_seconds: Option<f64>,
    pub color: String,
}
