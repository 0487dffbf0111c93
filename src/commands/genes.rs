//! Genes command implementation.
//!
//! Splits a multi-FASTA gene catalog into one sequence set per cluster.
//! By default catalog records are joined on their 1-based position.

use super::{dispatch_filtered, emit, log_index, ExtractStats, OutputTarget};
use crate::config::SizeBasis;
use crate::fasta::FastaReader;
use crate::filter::SizeBounds;
use crate::gene::KeyMode;
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::Result;
use crate::payload::{Payload, PayloadKind};
use std::io::Read;
use std::path::Path;

/// Genes command configuration.
#[derive(Debug, Clone)]
pub struct GenesCommand {
    pub bounds: SizeBounds,
    pub key_mode: KeyMode,
    pub size_basis: SizeBasis,
}

impl Default for GenesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl GenesCommand {
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
        catalog: Q,
        target: &OutputTarget,
    ) -> Result<ExtractStats> {
        let catalog = catalog.as_ref();

        log::info!("STEP 1/3: Reading clusters file...");
        let index = MembershipIndex::from_path(clusters, self.key_mode)?;
        log_index(&index);

        log::info!("STEP 2/3: Extracting clusters genes from genes catalog...");
        let (groups, mut stats) = FastaReader::from_path(catalog)
            .and_then(|reader| self.extract(&index, reader))
            .map_err(|e| e.in_file(catalog))?;

        log::info!("STEP 3/3: Writing clusters genes...");
        stats.outputs = emit(&groups, PayloadKind::Sequence, target, |_, entries| {
            entries.len()
        })?;
        log::debug!("genes: {}", stats);

        Ok(stats)
    }

    /// Dispatch catalog records into size-filtered cluster groups.
    pub fn extract<R: Read>(
        &self,
        index: &MembershipIndex,
        catalog: FastaReader<R>,
    ) -> Result<(ClusterGroups<Payload>, ExtractStats)> {
        let source = catalog
            .keyed(self.key_mode)
            .map(|record| record.map(|(key, rec)| (key, Payload::Sequence(rec))));
        dispatch_filtered(index, source, self.bounds, self.size_basis)
    }
}
