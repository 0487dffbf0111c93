//! Overlap counts between two independent clusterings of the same genes.
//!
//! For every query cluster, each gene adds one count to every reference
//! cluster it belongs to, or one count to the `unknown` bucket when the
//! reference does not list it at all. A reference cluster named `unknown`
//! shares that bucket.

use crate::gene::{ClusterId, GeneId};
use crate::groups::{ClusterGroups, FxIndexMap};
use crate::index::MembershipIndex;
use crate::payload::Payload;

/// Label rendered for genes absent from the reference.
pub const UNKNOWN_LABEL: &str = "unknown";

/// A reference bucket: a named reference cluster or the unknown bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefCluster {
    Cluster(ClusterId),
    Unknown,
}

impl RefCluster {
    /// Bucket of a named reference cluster.
    pub fn named(name: &str) -> Self {
        if name == UNKNOWN_LABEL {
            RefCluster::Unknown
        } else {
            RefCluster::Cluster(name.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RefCluster::Cluster(name) => name,
            RefCluster::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Reference breakdown of one query cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryComparison {
    pub query: ClusterId,
    /// Number of genes listed for the query cluster.
    pub size: usize,
    /// Reference buckets by descending count, ties in encounter order.
    pub overlaps: Vec<(RefCluster, usize)>,
}

impl QueryComparison {
    /// Count for one bucket (0 if the bucket never appeared).
    pub fn count(&self, reference: &RefCluster) -> usize {
        self.overlaps
            .iter()
            .find(|(r, _)| r == reference)
            .map_or(0, |(_, c)| *c)
    }

    /// Sum of all bucket counts. Exceeds `size` when query genes belong to
    /// several reference clusters.
    pub fn total(&self) -> usize {
        self.overlaps.iter().map(|(_, c)| c).sum()
    }
}

/// Query clusters by descending size, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonMatrix {
    rows: Vec<QueryComparison>,
}

impl ComparisonMatrix {
    /// Compare every query cluster against the reference index.
    pub fn build(reference: &MembershipIndex, query: &ClusterGroups<GeneId>) -> Self {
        let mut rows: Vec<QueryComparison> = query
            .iter()
            .map(|(cluster, genes)| compare_cluster(reference, cluster, genes))
            .collect();

        // Vec::sort_by is stable
        rows.sort_by(|a, b| b.size.cmp(&a.size));

        Self { rows }
    }

    pub fn rows(&self) -> &[QueryComparison] {
        &self.rows
    }

    pub fn get(&self, query: &str) -> Option<&QueryComparison> {
        self.rows.iter().find(|row| row.query == query)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to payload groups, keeping row and bucket order.
    pub fn to_payload_groups(&self) -> ClusterGroups<Payload> {
        let mut groups = ClusterGroups::new();
        for row in &self.rows {
            for (reference, count) in &row.overlaps {
                groups.push(
                    &row.query,
                    Payload::Overlap {
                        reference: reference.clone(),
                        count: *count,
                    },
                );
            }
        }
        groups
    }
}

fn compare_cluster(reference: &MembershipIndex, query: &str, genes: &[GeneId]) -> QueryComparison {
    let mut counts: FxIndexMap<RefCluster, usize> = FxIndexMap::default();

    for gene in genes {
        match reference.clusters_of(gene) {
            Some(ref_clusters) => {
                for ref_cluster in ref_clusters {
                    *counts.entry(RefCluster::named(ref_cluster)).or_insert(0) += 1;
                }
            }
            None => *counts.entry(RefCluster::Unknown).or_insert(0) += 1,
        }
    }

    let mut overlaps: Vec<(RefCluster, usize)> = counts.into_iter().collect();
    overlaps.sort_by(|a, b| b.1.cmp(&a.1));

    QueryComparison {
        query: query.to_string(),
        size: genes.len(),
        overlaps,
    }
}
