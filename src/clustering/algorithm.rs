use std::fmt;

use serde::Serialize;

use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;

/// An event kind that can be collapsed into time clusters.
pub trait ClusterMember: Clone + fmt::Debug + PartialEq + Serialize {
    /// Merged statistics carried by every cluster of this kind.
    type Summary: Clone + fmt::Debug + PartialEq + Serialize;

    /// Prefix for cluster ids, e.g. `git`.
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn timestamp(&self) -> Option<i64>;

    /// Compute the merged statistics for one closed cluster, members in time order.
    fn summarize(members: &[Self]) -> Self::Summary;
}

/// One visual unit standing in for a burst of events. Singletons use the
/// same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = "E: ClusterMember"))]
pub struct ClusteredGroup<E: ClusterMember> {
    pub id: String,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub merged_count: usize,
    pub events: Vec<E>,
    #[serde(flatten)]
    pub summary: E::Summary,
}

impl<E: ClusterMember> ClusteredGroup<E> {
    pub fn span_secs(&self) -> i64 {
        self.end_timestamp - self.start_timestamp
    }
}

/// The cluster currently being extended by the scan.
struct OpenGroup<E> {
    start_timestamp: i64,
    last_timestamp: i64,
    events: Vec<E>,
}

impl<E: ClusterMember> OpenGroup<E> {
    fn start(timestamp: i64, event: E) -> Self {
        Self {
            start_timestamp: timestamp,
            last_timestamp: timestamp,
            events: vec![event],
        }
    }

    fn close(self) -> ClusteredGroup<E> {
        let id = format!("{}-cluster-{}", E::KIND, self.events[0].id());
        ClusteredGroup {
            id,
            start_timestamp: self.start_timestamp,
            end_timestamp: self.last_timestamp,
            merged_count: self.events.len(),
            summary: E::summarize(&self.events),
            events: self.events,
        }
    }
}

/// Cluster events whose gap to the previous event is at most `gap_threshold_secs`.
///
/// Events are ordered by timestamp first (stable, so ties keep input order).
/// The gap is measured against the latest member of the open cluster, never
/// against its first member, so a steady trickle of events forms one chain.
/// Events without a timestamp are skipped.
pub fn cluster<E: ClusterMember>(events: &[E], gap_threshold_secs: i64) -> Vec<ClusteredGroup<E>> {
    let mut timed: Vec<(i64, &E)> = events
        .iter()
        .filter_map(|event| match event.timestamp() {
            Some(ts) => Some((ts, event)),
            None => {
                log_warn!("{}-{} has no timestamp; not clustered", E::KIND, event.id());
                None
            }
        })
        .collect();
    timed.sort_by_key(|(ts, _)| *ts);

    let mut groups = Vec::new();
    let mut current: Option<OpenGroup<E>> = None;

    for (timestamp, event) in timed {
        match &mut current {
            Some(group) if timestamp - group.last_timestamp <= gap_threshold_secs => {
                group.events.push(event.clone());
                group.last_timestamp = timestamp;
            }
            _ => {
                if let Some(group) = current.take() {
                    groups.push(group.close());
                }
                current = Some(OpenGroup::start(timestamp, event.clone()));
            }
        }
    }

    if let Some(group) = current {
        groups.push(group.close());
    }

    log_debug!(
        "clustered {} {} events into {} groups (gap {}s)",
        events.len(),
        E::KIND,
        groups.len(),
        gap_threshold_secs
    );
    groups
}
