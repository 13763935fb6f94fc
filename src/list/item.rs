use serde::{Deserialize, Serialize};

use crate::models::{DayBundle, DotType, EventFilters, RawEvent};
use crate::normalize::{dot_type_of, label_for, row_key_for};

/// One line of the flat list view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub original_id: i64,
    #[serde(rename = "type")]
    pub item_type: DotType,
    pub timestamp: i64,
    pub duration_seconds: Option<f64>,
    /// Application for activities, lane name for other sources.
    pub app: String,
    pub title: String,
    pub subtitle: String,
    pub project: Option<String>,
}

impl ListItem {
    /// Build the list line for one record, or `None` when a required field is missing.
    pub fn from_event(event: RawEvent<'_>) -> Option<Self> {
        let item_type = dot_type_of(event);
        let timestamp = event.timestamp()?;
        let title = label_for(event)?;
        let app = row_key_for(event)?;

        let (subtitle, project) = match event {
            RawEvent::Activity(activity) => (
                activity.category.clone(),
                activity.project.clone().filter(|p| !p.trim().is_empty()),
            ),
            RawEvent::Commit(commit) => (
                format!("{} {}", commit.branch_name(), commit.short_hash)
                    .trim_end()
                    .to_string(),
                Some(commit.repository_name().to_string()),
            ),
            RawEvent::ShellCommand(command) => (command.working_directory.clone(), None),
            RawEvent::BrowserVisit(visit) => (visit.domain.clone(), None),
            RawEvent::File(file) => (file.directory.clone(), None),
            RawEvent::AwayPeriod(away) => (away.trigger_type.clone(), None),
            RawEvent::Screenshot(shot) => (shot.app_name.clone(), None),
        };

        Some(Self {
            id: format!("{}-{}", item_type.as_str(), event.original_id()),
            original_id: event.original_id(),
            item_type,
            timestamp,
            duration_seconds: event.duration_seconds(),
            app,
            title,
            subtitle,
            project,
        })
    }
}

/// Flatten every enabled source of `bundle` into list items, in source order.
pub fn list_items(bundle: &DayBundle, filters: &EventFilters) -> Vec<ListItem> {
    bundle
        .events(filters)
        .into_iter()
        .filter_map(ListItem::from_event)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Commit};

    #[test]
    fn commit_item_carries_repository_as_project() {
        let commit = Commit {
            id: 3,
            timestamp: Some(100),
            repository: Some("daygrid".into()),
            branch: Some("feature/list".into()),
            message: Some("Add list view\n\nbody".into()),
            short_hash: "1a2b3c4".into(),
            insertions: 1,
            deletions: 0,
        };
        let item = ListItem::from_event(RawEvent::Commit(&commit)).unwrap();
        assert_eq!(item.id, "git-3");
        assert_eq!(item.app, "Git");
        assert_eq!(item.title, "Add list view");
        assert_eq!(item.subtitle, "feature/list 1a2b3c4");
        assert_eq!(item.project.as_deref(), Some("daygrid"));
    }

    #[test]
    fn activity_item_uses_app_and_category() {
        let activity = Activity {
            id: 1,
            start_time: Some(10),
            end_time: Some(70),
            duration_seconds: 60.0,
            app_name: Some("Code".into()),
            window_title: "main.rs".into(),
            category: "coding".into(),
            project: Some(" ".into()),
        };
        let item = ListItem::from_event(RawEvent::Activity(&activity)).unwrap();
        assert_eq!(item.app, "Code");
        assert_eq!(item.title, "main.rs");
        assert_eq!(item.subtitle, "coding");
        assert_eq!(item.project, None);
        assert_eq!(item.duration_seconds, Some(60.0));
    }

    #[test]
    fn records_without_timestamp_are_skipped() {
        let bundle = DayBundle::from_json(
            r#"{"shellCommands": [{"id": 1, "command": "ls"}, {"id": 2, "timestamp": 5, "command": "pwd"}]}"#,
        )
        .unwrap();
        let items = list_items(&bundle, &EventFilters::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "shell-2");
    }
}
