//! Compare command implementation.
//!
//! Cross-tabulates a query clustering against a reference clustering of the
//! same genes.

use super::{log_index, ExtractStats};
use crate::compare::ComparisonMatrix;
use crate::filter::{self, SizeBounds};
use crate::gene::KeyMode;
use crate::index::MembershipIndex;
use crate::membership::{ClusterError, Result};
use crate::output::write_report;
use std::fs::File;
use std::path::Path;

/// Compare command configuration.
///
/// The size bounds apply to query clusters only.
#[derive(Debug, Clone, Default)]
pub struct CompareCommand {
    pub bounds: SizeBounds,
}

impl CompareCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Run on files, writing the combined comparison report to `output`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>, O: AsRef<Path>>(
        &self,
        reference: P,
        query: Q,
        output: O,
    ) -> Result<ExtractStats> {
        let output = output.as_ref();

        log::info!("STEP 1/4: Indexing reference clusters...");
        let reference = MembershipIndex::from_path(reference, KeyMode::Name)?;
        log_index(&reference);

        log::info!("STEP 2/4: Indexing query clusters...");
        let query = MembershipIndex::from_path(query, KeyMode::Name)?;
        log_index(&query);

        log::info!("STEP 3/4: Comparing clusters...");
        let matrix = self.compare(&reference, query);
        log::debug!("compare: {} query clusters", matrix.len());

        log::info!("STEP 4/4: Writing comparison...");
        let groups = matrix.to_payload_groups();
        let file = File::create(output).map_err(|e| ClusterError::from(e).in_file(output))?;
        write_report(file, &groups, |cluster, _| {
            matrix.get(cluster).map_or(0, |row| row.size)
        })?;

        Ok(ExtractStats {
            clusters_kept: matrix.len(),
            entries_written: groups.total_items(),
            outputs: vec![output.to_path_buf()],
            ..Default::default()
        })
    }

    /// Filter the query clusters by size and compare them to the reference.
    pub fn compare(&self, reference: &MembershipIndex, query: MembershipIndex) -> ComparisonMatrix {
        let query = filter::filter(query.into_cluster_to_genes(), self.bounds);
        ComparisonMatrix::build(reference, &query)
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
    fn test_report() {
        let reference = create_temp_file("c1\tgA\nc2\tgB\n");
        let query = create_temp_file("q1\tgA\nq1\tgB\nq1\tgC\nq2\tgB\n");
        let out = TempDir::new().unwrap();
        let report = out.path().join("comparison.txt");

        let stats = CompareCommand::new()
            .run(reference.path(), query.path(), &report)
            .unwrap();

        assert_eq!(stats.clusters_kept, 2);
        assert_eq!(
            fs::read_to_string(&report).unwrap(),
            "q1 (3 genes):\n\tc1\t1\n\tc2\t1\n\tunknown\t1\n\n\
             q2 (1 genes):\n\tc2\t1\n\n"
        );
    }

    #[test]
    fn test_bounds_apply_to_query_only() {
        // Reference clusters of size 1 still count
        let reference = MembershipIndex::parse("r1\tg1\nr2\tg2\n", KeyMode::Name).unwrap();
        let query = MembershipIndex::parse("big\tg1\nbig\tg2\nsmall\tg1\n", KeyMode::Name).unwrap();

        let matrix = CompareCommand::new()
            .with_bounds(SizeBounds::at_least(2))
            .compare(&reference, query);

        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.rows()[0].query, "big");
        assert_eq!(matrix.rows()[0].total(), 2);
    }

    #[test]
    fn test_malformed_query_fails() {
        let reference = create_temp_file("c1\tgA\n");
        let query = create_temp_file("q1 gA extra\n");
        let out = TempDir::new().unwrap();

        let err = CompareCommand::new()
            .run(reference.path(), query.path(), out.path().join("comparison.txt"))
            .unwrap_err();

        assert!(err.is_format_error());
        assert!(!out.path().join("comparison.txt").exists());
    }
}
