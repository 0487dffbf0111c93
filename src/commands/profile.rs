//! Profile command implementation.
//!
//! Splits an abundance profile table into one table per cluster. Rows are
//! copied verbatim; by default they are joined on their first column.

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

/// Profile command configuration.
#[derive(Debug, Clone)]
pub struct ProfileCommand {
    pub bounds: SizeBounds,
    pub key_mode: KeyMode,
    pub size_basis: SizeBasis,
    /// The profile table starts with a header line (sample names).
    pub with_header: bool,
}

impl Default for ProfileCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCommand {
    pub fn new() -> Self {
        Self {
            bounds: SizeBounds::default(),
            key_mode: KeyMode::Name,
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
        profiles: Q,
        target: &OutputTarget,
    ) -> Result<ExtractStats> {
        let profiles = profiles.as_ref();

        log::info!("STEP 1/3: Reading clusters file...");
        let index = MembershipIndex::from_path(clusters, self.key_mode)?;
        log_index(&index);

        log::info!("STEP 2/3: Extracting clusters profile from profiles file...");
        let (groups, mut stats) = LineRecordReader::from_path(profiles, self.key_mode)
            .and_then(|reader| self.extract(&index, reader))
            .map_err(|e| e.in_file(profiles))?;

        log::info!("STEP 3/3: Writing clusters profile...");
        stats.outputs = emit(&groups, PayloadKind::Profile, target, |_, entries| {
            entries.len()
        })?;
        log::debug!("profile: {}", stats);

        Ok(stats)
    }

    /// Dispatch profile rows into size-filtered cluster groups.
    pub fn extract<R: Read>(
        &self,
        index: &MembershipIndex,
        profiles: LineRecordReader<R>,
    ) -> Result<(ClusterGroups<Payload>, ExtractStats)> {
        let source = profiles
            .with_header(self.with_header)
            .records()
            .map(|record| record.map(|(key, line)| (key, Payload::Profile(line))));
        dispatch_filtered(index, source, self.bounds, self.size_basis)
    }
}
