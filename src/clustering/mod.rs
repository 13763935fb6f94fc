pub mod algorithm;
pub mod config;
pub mod summary;

pub use algorithm::{cluster, ClusterMember, ClusteredGroup};
pub use config::ClusterConfig;
pub use summary::{CommitSummary, ShellSummary, MAX_DISPLAY_BRANCHES};

use crate::models::{Commit, ShellCommand};

pub fn cluster_commits(commits: &[Commit], config: &ClusterConfig) -> Vec<ClusteredGroup<Commit>> {
    cluster(commits, config.commit_gap_secs)
}

pub fn cluster_shell_commands(
    commands: &[ShellCommand],
    config: &ClusterConfig,
) -> Vec<ClusteredGroup<ShellCommand>> {
    cluster(commands, config.shell_gap_secs)
}
