//! Merged statistics for commit and shell-command clusters.

use serde::{Deserialize, Serialize};

use crate::clustering::algorithm::ClusterMember;
use crate::models::{Commit, ShellCommand};

/// Branch names shown on a commit cluster before the rest collapse into a count.
pub const MAX_DISPLAY_BRANCHES: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub total_insertions: i64,
    pub total_deletions: i64,
    /// Distinct branches in order of first appearance, at most [`MAX_DISPLAY_BRANCHES`].
    pub branches: Vec<String>,
    /// Distinct branches beyond the displayed ones.
    pub hidden_branch_count: usize,
    pub repositories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellSummary {
    pub success_count: usize,
    pub failure_count: usize,
    pub total_duration_secs: f64,
    pub directories: Vec<String>,
}

impl ClusterMember for Commit {
    type Summary = CommitSummary;
    const KIND: &'static str = "git";

    fn id(&self) -> i64 {
        self.id
    }

    fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    fn summarize(members: &[Self]) -> CommitSummary {
        let mut branches = distinct_in_order(members.iter().map(Commit::branch_name));
        let hidden_branch_count = branches.len().saturating_sub(MAX_DISPLAY_BRANCHES);
        branches.truncate(MAX_DISPLAY_BRANCHES);

        CommitSummary {
            total_insertions: members.iter().map(|c| c.insertions).sum(),
            total_deletions: members.iter().map(|c| c.deletions).sum(),
            branches,
            hidden_branch_count,
            repositories: distinct_in_order(members.iter().map(Commit::repository_name)),
        }
    }
}

impl ClusterMember for ShellCommand {
    type Summary = ShellSummary;
    const KIND: &'static str = "shell";

    fn id(&self) -> i64 {
        self.id
    }

    fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    fn summarize(members: &[Self]) -> ShellSummary {
        let success_count = members.iter().filter(|c| c.succeeded()).count();
        ShellSummary {
            success_count,
            failure_count: members.len() - success_count,
            total_duration_secs: members.iter().map(|c| c.duration_seconds.max(0.0)).sum(),
            directories: distinct_in_order(
                members
                    .iter()
                    .map(|c| c.working_directory.as_str())
                    .filter(|dir| !dir.is_empty()),
            ),
        }
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        if !distinct.iter().any(|seen| seen == value) {
            distinct.push(value.to_string());
        }
    }
    distinct
}
