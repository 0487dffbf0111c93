//! mOTU breakdown command implementation.
//!
//! Lists, for every cluster within the size bounds, which of its genes fall
//! in each taxonomic unit.

use super::{emit, log_index, ExtractStats, OutputTarget};
use crate::breakdown::UnitLabels;
use crate::filter::{self, SizeBounds};
use crate::gene::{GeneId, KeyMode};
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::Result;
use crate::payload::{Payload, PayloadKind};
use crate::sources::TaxonomicUnitReader;
use std::path::Path;

/// mOTU command configuration.
///
/// Genes are always matched by name and clusters are filtered on their
/// membership size.
#[derive(Debug, Clone, Default)]
pub struct MotusCommand {
    pub bounds: SizeBounds,
}

impl MotusCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Run on files.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        clusters: P,
        motus: Q,
        target: &OutputTarget,
    ) -> Result<ExtractStats> {
        let motus = motus.as_ref();

        log::info!("STEP 1/4: Reading clusters file...");
        let index = MembershipIndex::from_path(clusters, KeyMode::Name)?;
        log_index(&index);
        let total = index.num_clusters();
        let members = filter::filter(index.into_cluster_to_genes(), self.bounds);
        log::debug!(
            "size filter {}: kept {} of {} clusters",
            self.bounds,
            members.len(),
            total
        );

        log::info!("STEP 2/4: Reading mOTUs file...");
        let units = TaxonomicUnitReader::from_path(motus)
            .and_then(|reader| UnitLabels::from_source(reader.labels()))
            .map_err(|e| e.in_file(motus))?;
        log::debug!(
            "mOTUs: {} labels over {} genes",
            units.num_labels(),
            units.num_genes()
        );

        log::info!("STEP 3/4: Extracting clusters mOTUs...");
        let groups = self.extract(&units, &members);

        log::info!("STEP 4/4: Writing clusters mOTUs...");
        let outputs = emit(&groups, PayloadKind::TaxonomicUnits, target, |cluster, _| {
            members.size_of(cluster)
        })?;

        let stats = ExtractStats {
            clusters_kept: groups.len(),
            clusters_filtered: total - members.len(),
            entries_written: groups.total_items(),
            outputs,
            ..Default::default()
        };
        log::debug!("motus: {}", stats);
        Ok(stats)
    }

    /// Break already-filtered membership groups down by unit label.
    pub fn extract(&self, units: &UnitLabels, members: &ClusterGroups<GeneId>) -> ClusterGroups<Payload> {
        units.breakdown(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_report_lists_every_label() {
        let clusters = create_temp_file("c1\tg1\nc1\tg2\nc2\tg3\n");
        let motus = create_temp_file("g1\tmotu_1\ng2\tmotu_2\ng3\tmotu_1\n");
        let out = TempDir::new().unwrap();
        let report = out.path().join("motus.txt");

        MotusCommand::new()
            .run(clusters.path(), motus.path(), &OutputTarget::report(&report))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&report).unwrap(),
            "c1 (2 genes):\n\tmotu_1=g1\n\tmotu_2=g2\n\n\
             c2 (1 genes):\n\tmotu_1=g3\n\tmotu_2=\n\n"
        );
    }

    #[test]
    fn test_filters_on_membership_size() {
        let clusters = create_temp_file("c1\tg1\nc1\tg2\nc2\tg3\n");
        let motus = create_temp_file("g1 mA\n");
        let out = TempDir::new().unwrap();

        let stats = MotusCommand::new()
            .with_bounds(SizeBounds::at_least(2))
            .run(clusters.path(), motus.path(), &OutputTarget::directory(out.path()))
            .unwrap();

        assert_eq!(stats.clusters_kept, 1);
        assert_eq!(stats.clusters_filtered, 1);
        assert_eq!(
            fs::read_to_string(out.path().join("c1.mOTUs.txt")).unwrap(),
            "mA=g1\n"
        );
        assert!(!out.path().join("c2.mOTUs.txt").exists());
    }

    #[test]
    fn test_single_token_unit_line_fails() {
        let clusters = create_temp_file("c1\tg1\n");
        let motus = create_temp_file("g1\tmA\ng2\n");
        let out = TempDir::new().unwrap();

        let err = MotusCommand::new()
            .run(clusters.path(), motus.path(), &OutputTarget::directory(out.path()))
            .unwrap_err();
        assert!(err.is_format_error());
    }
}
