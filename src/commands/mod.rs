//! Command implementations for gct.

pub mod annotation;
pub mod annotation_table;
pub mod compare;
pub mod connections;
pub mod genes;
pub mod motus;
pub mod profile;
pub mod sizes;

pub use annotation::AnnotationCommand;
pub use annotation_table::AnnotationTableCommand;
pub use compare::CompareCommand;
pub use connections::ConnectionsCommand;
pub use genes::GenesCommand;
pub use motus::MotusCommand;
pub use profile::ProfileCommand;
pub use sizes::SizesCommand;

use crate::config::{CombinedFormat, SizeBasis};
use crate::dispatch::{DispatchStats, RecordDispatcher};
use crate::filter::{self, SizeBounds};
use crate::gene::GeneId;
use crate::groups::ClusterGroups;
use crate::index::MembershipIndex;
use crate::membership::{ClusterError, Result};
use crate::output::{write_report, write_table, PerClusterWriter};
use crate::payload::{Payload, PayloadKind};
use std::fmt;
use std::fs::File;
use std::path::PathBuf;

/// Where a command writes its grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One file per cluster inside an existing directory.
    Directory(PathBuf),
    /// One combined file.
    File {
        path: PathBuf,
        format: CombinedFormat,
    },
}

impl OutputTarget {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        OutputTarget::Directory(dir.into())
    }

    pub fn report(path: impl Into<PathBuf>) -> Self {
        OutputTarget::File {
            path: path.into(),
            format: CombinedFormat::Report,
        }
    }

    pub fn table(path: impl Into<PathBuf>) -> Self {
        OutputTarget::File {
            path: path.into(),
            format: CombinedFormat::Table,
        }
    }
}

/// Summary of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub dispatch: DispatchStats,
    /// Clusters written.
    pub clusters_kept: usize,
    /// Clusters removed by the size filter.
    pub clusters_filtered: usize,
    /// Entries written across all clusters.
    pub entries_written: usize,
    /// Files created (one per cluster in directory mode).
    pub outputs: Vec<PathBuf>,
}

impl fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clusters kept={} filtered={} entries={} outputs={}",
            self.dispatch,
            self.clusters_kept,
            self.clusters_filtered,
            self.entries_written,
            self.outputs.len()
        )
    }
}

/// Apply the size filter to dispatched groups.
///
/// With [`SizeBasis::Members`] the bounds are checked against the membership
/// counts in `members`; otherwise against the group sizes themselves.
/// Returns the number of clusters removed.
pub fn apply_size_filter<T>(
    groups: &mut ClusterGroups<T>,
    members: &ClusterGroups<GeneId>,
    bounds: SizeBounds,
    basis: SizeBasis,
) -> usize {
    match basis {
        SizeBasis::Records => filter::retain_within(groups, bounds),
        SizeBasis::Members => {
            let before = groups.len();
            groups.retain(|cluster, _| bounds.contains(members.size_of(cluster)));
            before - groups.len()
        }
    }
}

/// Dispatch a keyed payload source through the index, then size-filter.
pub fn dispatch_filtered<I>(
    index: &MembershipIndex,
    source: I,
    bounds: SizeBounds,
    basis: SizeBasis,
) -> Result<(ClusterGroups<Payload>, ExtractStats)>
where
    I: IntoIterator<Item = Result<(GeneId, Payload)>>,
{
    let mut dispatcher = RecordDispatcher::new(index);
    let mut groups = dispatcher.dispatch(source)?;
    log::debug!("dispatch: {}", dispatcher.stats());

    let clusters_filtered = apply_size_filter(&mut groups, index.cluster_to_genes(), bounds, basis);
    log::debug!(
        "size filter {} on {}: removed {} clusters",
        bounds,
        basis,
        clusters_filtered
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

/// Log the shape of a freshly built membership index.
pub(crate) fn log_index(index: &MembershipIndex) {
    log::debug!(
        "membership: {} pairs, {} clusters, {} genes",
        index.num_pairs(),
        index.num_clusters(),
        index.num_genes()
    );
}

/// Write a grouping to its target.
///
/// `size_of` gives the gene count shown in report headers.
pub fn emit<F>(
    groups: &ClusterGroups<Payload>,
    kind: PayloadKind,
    target: &OutputTarget,
    size_of: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&str, &[Payload]) -> usize,
{
    match target {
        OutputTarget::Directory(dir) => PerClusterWriter::new(dir, kind).write_all(groups),
        OutputTarget::File { path, format } => {
            let file = File::create(path).map_err(|e| ClusterError::from(e).in_file(path))?;
            match format {
                CombinedFormat::Report => write_report(file, groups, size_of)?,
                CombinedFormat::Table => write_table(file, groups)?,
            }
            Ok(vec![path.clone()])
        }
    }
}
