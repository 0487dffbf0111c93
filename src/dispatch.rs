//! Fan-out of secondary-source records into cluster groups.

use crate::gene::GeneId;
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::Result;
use crate::sources::Connection;
use std::fmt;

/// Counters collected during one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Records read from the source.
    pub records_read: usize,
    /// Records whose key resolved to at least one cluster.
    pub records_matched: usize,
    /// Entries appended across all groups (fan-out included).
    pub entries_dispatched: usize,
    /// Records dropped because their key is not in the index, or (for
    /// connections) because the endpoints are in different clusters.
    pub records_dropped: usize,
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} matched={} dispatched={} dropped={}",
            self.records_read, self.records_matched, self.entries_dispatched, self.records_dropped
        )
    }
}

/// Routes keyed records to every cluster of their gene.
pub struct RecordDispatcher<'a> {
    index: &'a MembershipIndex,
    stats: DispatchStats,
}

impl<'a> RecordDispatcher<'a> {
    pub fn new(index: &'a MembershipIndex) -> Self {
        Self {
            index,
            stats: DispatchStats::default(),
        }
    }

    /// Consume `source` once, appending each matched payload to all of its
    /// gene's clusters. Unknown keys are skipped.
    pub fn dispatch<I, T>(&mut self, source: I) -> Result<ClusterGroups<T>>
    where
        I: IntoIterator<Item = Result<(GeneId, T)>>,
        T: Clone,
    {
        let mut groups = ClusterGroups::new();

        for record in source {
            let (key, payload) = record?;
            self.stats.records_read += 1;

            let Some(clusters) = self.index.clusters_of(&key) else {
                self.stats.records_dropped += 1;
                continue;
            };
            self.stats.records_matched += 1;
            self.stats.entries_dispatched += clusters.len();

            if let Some((last, rest)) = clusters.split_last() {
                for cluster in rest {
                    groups.push(cluster, payload.clone());
                }
                groups.push(last, payload);
            }
        }

        Ok(groups)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

/// Keeps the edges whose endpoints both belong to the same cluster.
///
/// Gene assignment is 1:1 here: a gene listed under several clusters counts
/// only for the last one.
pub struct ConnectionDispatcher<'a> {
    index: &'a MembershipIndex,
    stats: DispatchStats,
}

impl<'a> ConnectionDispatcher<'a> {
    pub fn new(index: &'a MembershipIndex) -> Self {
        Self {
            index,
            stats: DispatchStats::default(),
        }
    }

    pub fn dispatch<I>(&mut self, edges: I) -> Result<ClusterGroups<Connection>>
    where
        I: IntoIterator<Item = Result<Connection>>,
    {
        let mut groups = ClusterGroups::new();

        for edge in edges {
            let edge = edge?;
            self.stats.records_read += 1;

            let cluster_a = self.index.last_cluster_of(&edge.gene_a);
            let cluster_b = self.index.last_cluster_of(&edge.gene_b);
            match (cluster_a, cluster_b) {
                (Some(a), Some(b)) if a == b => {
                    self.stats.records_matched += 1;
                    self.stats.entries_dispatched += 1;
                    groups.push(a, edge);
                }
                _ => self.stats.records_dropped += 1,
            }
        }

        Ok(groups)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}
