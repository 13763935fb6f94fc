//! Flat list view: every record as one line, filtered and sorted.

pub mod item;
pub mod sort;

use serde::{Deserialize, Serialize};

use crate::log_debug;
use crate::models::DotType;

pub use item::{list_items, ListItem};
pub use sort::{SortColumn, SortDirection, SortState};

const ENABLE_LOGS: bool = false;

/// Conjunctive list filter. Empty fields impose no restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFilter {
    /// Case-insensitive substring of the title or subtitle.
    pub search: Option<String>,
    pub apps: Vec<String>,
    pub types: Vec<DotType>,
    pub projects: Vec<String>,
}

impl ListFilter {
    pub fn matches(&self, item: &ListItem) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            if !item.title.to_lowercase().contains(&needle)
                && !item.subtitle.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if !self.apps.is_empty() && !self.apps.iter().any(|app| app.eq_ignore_ascii_case(&item.app)) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&item.item_type) {
            return false;
        }
        if !self.projects.is_empty() {
            let Some(project) = item.project.as_deref() else {
                return false;
            };
            if !self.projects.iter().any(|p| p == project) {
                return false;
            }
        }
        true
    }
}

/// Items passing `filter`, ordered by `sort`.
pub fn project(items: &[ListItem], filter: &ListFilter, sort: &SortState) -> Vec<ListItem> {
    let mut visible: Vec<ListItem> = items.iter().filter(|i| filter.matches(i)).cloned().collect();
    sort.apply(&mut visible);
    log_debug!(
        "list shows {} of {} items sorted by {} {:?}",
        visible.len(),
        items.len(),
        sort.column,
        sort.direction
    );
    visible
}
