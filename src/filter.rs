//! Cluster size filtering.

use crate::groups::ClusterGroups;
use crate::membership::{ClusterError, Result};
use std::fmt;

/// Inclusive cardinality bounds `[min, max]` for a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    min: usize,
    max: Option<usize>,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

impl SizeBounds {
    /// Create bounds; `max = None` means unbounded.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self> {
        if let Some(max) = max {
            if min > max {
                return Err(ClusterError::InvalidArgument(format!(
                    "minimum cluster size ({}) is greater than maximum cluster size ({})",
                    min, max
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Bounds with only a lower limit.
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Check whether a cluster of `size` items passes.
    #[inline]
    pub fn contains(&self, size: usize) -> bool {
        size >= self.min && self.max.is_none_or(|max| size <= max)
    }

    /// True when every non-empty cluster passes.
    pub fn is_unbounded(&self) -> bool {
        self.min <= 1 && self.max.is_none()
    }
}

impl fmt::Display for SizeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, inf)", self.min),
        }
    }
}

/// Prune a grouping in place to the clusters whose size is within bounds.
///
/// Returns the number of clusters removed.
pub fn retain_within<T>(groups: &mut ClusterGroups<T>, bounds: SizeBounds) -> usize {
    let before = groups.len();
    groups.retain(|_, items| bounds.contains(items.len()));
    before - groups.len()
}

/// Return the subset of a grouping whose cluster sizes are within bounds.
pub fn filter<T>(mut groups: ClusterGroups<T>, bounds: SizeBounds) -> ClusterGroups<T> {
    retain_within(&mut groups, bounds);
    groups
}
