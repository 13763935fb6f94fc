use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use feruca::{Collator, Tailoring};
use serde::{Deserialize, Serialize};

use crate::list::item::ListItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Time,
    Duration,
    App,
    Title,
    Project,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Time => "time",
            SortColumn::Duration => "duration",
            SortColumn::App => "app",
            SortColumn::Title => "title",
            SortColumn::Project => "project",
        }
    }

    /// Ascending order of two items on this column. Text columns are
    /// compared with `collator`.
    pub fn compare(&self, collator: &mut Collator, a: &ListItem, b: &ListItem) -> Ordering {
        match self {
            SortColumn::Time => a.timestamp.cmp(&b.timestamp),
            SortColumn::Duration => a
                .duration_seconds
                .unwrap_or(0.0)
                .total_cmp(&b.duration_seconds.unwrap_or(0.0)),
            SortColumn::App => compare_text(collator, &a.app, &b.app),
            SortColumn::Title => compare_text(collator, &a.title, &b.title),
            SortColumn::Project => compare_text(
                collator,
                a.project.as_deref().unwrap_or(""),
                b.project.as_deref().unwrap_or(""),
            ),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        Ok(match value {
            "time" => SortColumn::Time,
            "duration" => SortColumn::Duration,
            "app" => SortColumn::App,
            "title" => SortColumn::Title,
            "project" => SortColumn::Project,
            other => bail!("cannot sort by {other:?}"),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn select(self, column: SortColumn) -> Self {
        if column == self.column {
            Self::new(column, self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }

    /// Stable sort; equal keys keep their input order in both directions.
    pub fn apply(&self, items: &mut [ListItem]) {
        let mut collator = text_collator();
        match self.direction {
            SortDirection::Asc => items.sort_by(|a, b| self.column.compare(&mut collator, a, b)),
            SortDirection::Desc => items.sort_by(|a, b| self.column.compare(&mut collator, b, a)),
        }
    }
}

/// Unicode collation with the CLDR root order. Punctuation is not ignored,
/// so `_notes` still sorts ahead of letters.
pub fn text_collator() -> Collator {
    Collator::new(Tailoring::default(), false, false)
}

/// Collation order first, raw text as tie-break so the order is total.
fn compare_text(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}
