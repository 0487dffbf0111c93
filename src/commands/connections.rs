//! Connections command implementation.
//!
//! Keeps the gene-gene edges whose endpoints fall in the same cluster.
//! Each gene counts for exactly one cluster: the last one it is listed
//! under in the membership file.

use super::{apply_size_filter, emit, log_index, ExtractStats, OutputTarget};
use crate::config::SizeBasis;
use crate::dispatch::ConnectionDispatcher;
use crate::filter::SizeBounds;
use crate::gene::KeyMode;
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::Result;
use crate::payload::{Payload, PayloadKind};
use crate::sources::ConnectionReader;
use std::io::Read;
use std::path::Path;

/// Connections command configuration.
#[derive(Debug, Clone)]
pub struct ConnectionsCommand {
    pub bounds: SizeBounds,
    pub key_mode: KeyMode,
    pub size_basis: SizeBasis,
}

impl Default for ConnectionsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionsCommand {
    pub fn new() -> Self {
        Self {
            bounds: SizeBounds::default(),
            key_mode: KeyMode::Position,
            size_basis: SizeBasis::Records,
        }
    }

    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    pub fn with_size_basis(mut self, size_basis: SizeBasis) -> Self {
        self.size_basis = size_basis;
        self
    }

    /// Run on files.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        clusters: P,
        connections: Q,
        target: &OutputTarget,
    ) -> Result<ExtractStats> {
        let connections = connections.as_ref();

        log::info!("STEP 1/3: Reading clusters file...");
        let index = MembershipIndex::from_path(clusters, self.key_mode)?;
        log_index(&index);

        log::info!(
            "STEP 2/3: Reading genes connections and filtering clusters by size {}...",
            self.bounds
        );
        let (groups, mut stats) = ConnectionReader::from_path(connections, self.key_mode)
            .and_then(|reader| self.extract(&index, reader))
            .map_err(|e| e.in_file(connections))?;
        log::debug!(
            "size filter on {}: removed {} clusters",
            self.size_basis,
            stats.clusters_filtered
        );

        log::info!("STEP 3/3: Writing clusters connections...");
        // Headers report the cluster's membership, not its edge count
        stats.outputs = emit(&groups, PayloadKind::Connections, target, |cluster, _| {
            index.genes_of(cluster).map_or(0, <[_]>::len)
        })?;
        log::debug!("connections: {}", stats);

        Ok(stats)
    }

    /// Group same-cluster edges, then size-filter.
    pub fn extract<R: Read>(
        &self,
        index: &MembershipIndex,
        connections: ConnectionReader<R>,
    ) -> Result<(ClusterGroups<Payload>, ExtractStats)> {
        let mut dispatcher = ConnectionDispatcher::new(index);
        let edges = dispatcher.dispatch(connections.connections())?;
        log::debug!("dispatch: {}", dispatcher.stats());

        let mut groups: ClusterGroups<Payload> = edges
            .into_iter()
            .flat_map(|(cluster, edges)| {
                edges
                    .into_iter()
                    .map(move |edge| (cluster.clone(), Payload::Connection(edge)))
            })
            .collect();
        let clusters_filtered = apply_size_filter(
            &mut groups,
            index.cluster_to_genes(),
            self.bounds,
            self.size_basis,
        );

        let stats = ExtractStats {
            dispatch: dispatcher.stats(),
            clusters_kept: groups.len(),
            clusters_filtered,
            entries_written: groups.total_items(),
            outputs: Vec::new(),
        };
        Ok((groups, stats))
    }
}
