use serde::{Deserialize, Serialize};

/// Gap thresholds for collapsing bursts of fine-grained events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfig {
    /// Commits closer than this to their predecessor share a cluster.
    pub commit_gap_secs: i64,

    /// Shell commands closer than this to their predecessor share a cluster.
    pub shell_gap_secs: i64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            commit_gap_secs: 900,
            shell_gap_secs: 600,
        }
    }
}
