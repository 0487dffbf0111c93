//! Run options shared by the cluster commands.
//!
//! Options are plain values handed to each command; nothing here is global.

use crate::membership::{ClusterError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which cluster size the size filter looks at.
///
/// The two diverge when the secondary source covers only part of the
/// membership file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeBasis {
    /// Number of records dispatched to the cluster.
    #[default]
    Records,
    /// Number of genes listed for the cluster in the membership file.
    Members,
}

impl FromStr for SizeBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "records" => Ok(SizeBasis::Records),
            "members" => Ok(SizeBasis::Members),
            other => Err(format!(
                "unknown size basis '{}' (expected 'records' or 'members')",
                other
            )),
        }
    }
}

impl fmt::Display for SizeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeBasis::Records => f.write_str("records"),
            SizeBasis::Members => f.write_str("members"),
        }
    }
}

/// Layout of a single combined output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinedFormat {
    /// One `<cluster> (<n> genes):` section per cluster.
    #[default]
    Report,
    /// One line per entry, prefixed with `<cluster>\t`.
    Table,
}

impl FromStr for CombinedFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "report" => Ok(CombinedFormat::Report),
            "table" => Ok(CombinedFormat::Table),
            other => Err(format!(
                "unknown output format '{}' (expected 'report' or 'table')",
                other
            )),
        }
    }
}

impl fmt::Display for CombinedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinedFormat::Report => f.write_str("report"),
            CombinedFormat::Table => f.write_str("table"),
        }
    }
}

/// Fail unless `path` is an existing regular file.
pub fn require_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(());
    }
    let reason = if path.is_dir() {
        "is a directory"
    } else {
        "does not exist"
    };
    Err(ClusterError::Path {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })
}

/// Fail unless `path` is an existing directory.
pub fn require_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    let reason = if path.is_file() {
        "is a file"
    } else {
        "does not exist"
    };
    Err(ClusterError::Path {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })
}
