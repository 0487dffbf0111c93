//! Bidirectional gene <-> cluster index built from a membership file.

use crate::gene::{ClusterId, GeneId, KeyMode};
use crate::groups::{ClusterGroups, FxIndexMap};
use crate::membership::{MembershipPair, MembershipReader, Result};
use std::io::Read;
use std::path::Path;

/// Immutable membership index.
///
/// Both directions hold one entry per input pair: a duplicated pair in the
/// source yields duplicated entries, and both directions keep first-seen
/// order.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    gene_to_clusters: FxIndexMap<GeneId, Vec<ClusterId>>,
    cluster_to_genes: ClusterGroups<GeneId>,
    num_pairs: usize,
}

impl MembershipIndex {
    /// Build an index from membership pairs.
    ///
    /// Stops at the first malformed pair; no partial index is returned.
    pub fn build<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<MembershipPair>>,
    {
        let mut gene_to_clusters: FxIndexMap<GeneId, Vec<ClusterId>> = FxIndexMap::default();
        let mut cluster_to_genes = ClusterGroups::new();
        let mut num_pairs = 0;

        for pair in pairs {
            let MembershipPair { cluster, gene } = pair?;
            cluster_to_genes.push(&cluster, gene.clone());
            gene_to_clusters.entry(gene).or_default().push(cluster);
            num_pairs += 1;
        }

        Ok(Self {
            gene_to_clusters,
            cluster_to_genes,
            num_pairs,
        })
    }

    /// Build an index from already-parsed pairs.
    pub fn from_pairs(pairs: Vec<MembershipPair>) -> Self {
        let mut gene_to_clusters: FxIndexMap<GeneId, Vec<ClusterId>> = FxIndexMap::default();
        let mut cluster_to_genes = ClusterGroups::new();
        let num_pairs = pairs.len();

        for MembershipPair { cluster, gene } in pairs {
            cluster_to_genes.push(&cluster, gene.clone());
            gene_to_clusters.entry(gene).or_default().push(cluster);
        }

        Self {
            gene_to_clusters,
            cluster_to_genes,
            num_pairs,
        }
    }

    /// Build an index from any readable membership source.
    pub fn from_reader<R: Read>(reader: R, key_mode: KeyMode) -> Result<Self> {
        Self::build(MembershipReader::new(reader, key_mode).pairs())
    }

    /// Build an index from a membership file.
    pub fn from_path<P: AsRef<Path>>(path: P, key_mode: KeyMode) -> Result<Self> {
        let path = path.as_ref();
        MembershipReader::from_path(path, key_mode)
            .and_then(|reader| Self::build(reader.pairs()))
            .map_err(|e| e.in_file(path))
    }

    /// Parse an index from a string (useful for testing).
    pub fn parse(content: &str, key_mode: KeyMode) -> Result<Self> {
        Self::from_reader(content.as_bytes(), key_mode)
    }

    /// Clusters a gene belongs to, in membership order.
    #[inline]
    pub fn clusters_of(&self, gene: &GeneId) -> Option<&[ClusterId]> {
        self.gene_to_clusters.get(gene).map(Vec::as_slice)
    }

    /// The cluster a gene was assigned to last (1:1 view, last write wins).
    #[inline]
    pub fn last_cluster_of(&self, gene: &GeneId) -> Option<&ClusterId> {
        self.gene_to_clusters.get(gene).and_then(|c| c.last())
    }

    /// Genes of a cluster, in membership order.
    #[inline]
    pub fn genes_of(&self, cluster: &str) -> Option<&[GeneId]> {
        self.cluster_to_genes.get(cluster)
    }

    /// The `cluster -> genes` direction of the index.
    pub fn cluster_to_genes(&self) -> &ClusterGroups<GeneId> {
        &self.cluster_to_genes
    }

    /// Iterate `(gene, clusters)` in first-seen gene order.
    pub fn genes(&self) -> impl Iterator<Item = (&GeneId, &[ClusterId])> {
        self.gene_to_clusters
            .iter()
            .map(|(gene, clusters)| (gene, clusters.as_slice()))
    }

    /// Number of membership pairs the index was built from.
    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    /// Number of distinct clusters.
    pub fn num_clusters(&self) -> usize {
        self.cluster_to_genes.len()
    }

    /// Number of distinct genes.
    pub fn num_genes(&self) -> usize {
        self.gene_to_clusters.len()
    }

    /// Consume the index, keeping the `cluster -> genes` direction.
    pub fn into_cluster_to_genes(self) -> ClusterGroups<GeneId> {
        self.cluster_to_genes
    }
}
