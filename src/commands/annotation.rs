//! Annotation command implementation.
//!
//! Routes each line of a gene annotation file to the clusters of its gene.
//! Lines are joined on their 1-based line number unless name keying is
//! requested.

use super::{dispatch_filtered, emit, log_index, ExtractStats, OutputTarget};
use crate::config::SizeBasis;
use crate::filter::SizeBounds;
use crate::gene::KeyMode;
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::Result;
use crate::payload::{Payload, PayloadKind};
use crate::sources::LineRecordReader;
use std::io::Read;
use std::path::Path;

/// Annotation command configuration.
#[derive(Debug, Clone)]
pub struct AnnotationCommand {
    pub bounds: SizeBounds,
    pub key_mode: KeyMode,
    pub size_basis: SizeBasis,
    pub with_header: bool,
}

impl Default for AnnotationCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationCommand {
    pub fn new() -> Self {
        Self {
            bounds: SizeBounds::default(),
            key_mode: KeyMode::Position,
            size_basis: SizeBasis::Records,
            with_header: false,
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

    pub fn with_header(mut self, with_header: bool) -> Self {
        self.with_header = with_header;
        self
    }

    /// Run on files.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        clusters: P,
        annotation: Q,
        target: &OutputTarget,
    ) -> Result<ExtractStats> {
        let annotation = annotation.as_ref();

        log::info!("STEP 1/3: Reading clusters file...");
        let index = MembershipIndex::from_path(clusters, self.key_mode)?;
        log_index(&index);

        log::info!("STEP 2/3: Extracting clusters annotation from annotation file...");
        let (groups, mut stats) = LineRecordReader::from_path(annotation, self.key_mode)
            .and_then(|reader| self.extract(&index, reader))
            .map_err(|e| e.in_file(annotation))?;

        log::info!("STEP 3/3: Writing clusters annotation...");
        stats.outputs = emit(&groups, PayloadKind::Annotation, target, |_, entries| {
            entries.len()
        })?;
        log::debug!("annotation: {}", stats);

        Ok(stats)
    }

    /// Dispatch annotation lines into size-filtered cluster groups.
    pub fn extract<R: Read>(
        &self,
        index: &MembershipIndex,
        annotation: LineRecordReader<R>,
    ) -> Result<(ClusterGroups<Payload>, ExtractStats)> {
        let source = annotation
            .with_header(self.with_header)
            .records()
            .map(|record| record.map(|(key, line)| (key, Payload::Annotation(line))));
        dispatch_filtered(index, source, self.bounds, self.size_basis)
    }
}
