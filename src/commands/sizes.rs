//! Sizes command implementation.
//!
//! Counts the membership lines of every cluster and writes the counts
//! largest first.

use crate::filter::SizeBounds;
use crate::gene::ClusterId;
use crate::groups::FxIndexMap;
use crate::membership::{ClusterError, Result};
use crate::output::ClusterWriter;
use crate::sources::LineCursor;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Default output file name.
pub const DEFAULT_SIZES_FILE: &str = "clusters_size.txt";

/// Sizes command configuration.
#[derive(Debug, Clone, Default)]
pub struct SizesCommand {
    pub bounds: SizeBounds,
}

impl SizesCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Run on files. Returns the number of clusters written.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, clusters: P, output: Q) -> Result<usize> {
        let clusters = clusters.as_ref();
        let output = output.as_ref();

        log::info!("STEP 1/2: Counting cluster sizes...");
        let file = File::open(clusters).map_err(|e| ClusterError::from(e).in_file(clusters))?;
        let sizes = self.count(file).map_err(|e| e.in_file(clusters))?;
        log::debug!("sizes: {} clusters within {}", sizes.len(), self.bounds);

        log::info!("STEP 2/2: Writing cluster sizes...");
        let out = File::create(output).map_err(|e| ClusterError::from(e).in_file(output))?;
        self.write(out, &sizes)?;

        Ok(sizes.len())
    }

    /// Count lines per cluster, keep those within bounds, sort largest first.
    ///
    /// Only the first token of each line is read. Ties keep first-seen order.
    pub fn count<R: Read>(&self, reader: R) -> Result<Vec<(ClusterId, usize)>> {
        let mut cursor = LineCursor::new(reader);
        let mut counts: FxIndexMap<ClusterId, usize> = FxIndexMap::default();

        while cursor.advance()? {
            let Some(cluster) = cursor.text()?.split_whitespace().next() else {
                return Err(ClusterError::Parse {
                    line: cursor.line_number(),
                    message: "Expected a cluster id".to_string(),
                });
            };
            match counts.get_mut(cluster) {
                Some(n) => *n += 1,
                None => {
                    counts.insert(cluster.to_string(), 1);
                }
            }
        }

        let mut sizes: Vec<(ClusterId, usize)> = counts
            .into_iter()
            .filter(|(_, n)| self.bounds.contains(*n))
            .collect();
        sizes.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(sizes)
    }

    /// Write `<cluster>\t<size>` lines.
    pub fn write<W: Write>(&self, output: W, sizes: &[(ClusterId, usize)]) -> Result<()> {
        let mut writer = ClusterWriter::new(output);
        for (cluster, size) in sizes {
            writer.write_count_line(cluster, *size)?;
        }
        writer.flush()
    }
}
