//! Insertion-ordered cluster-keyed groupings.
//!
//! Every join in the toolkit produces a `cluster -> [item]` mapping whose
//! iteration order is the order in which clusters were first seen.

use crate::gene::ClusterId;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Insertion-ordered hash map using the Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Append-only lists of items keyed by cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterGroups<T> {
    groups: FxIndexMap<ClusterId, Vec<T>>,
}

impl<T> Default for ClusterGroups<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClusterGroups<T> {
    /// Create an empty grouping.
    pub fn new() -> Self {
        Self {
            groups: FxIndexMap::default(),
        }
    }

    /// Append an item to a cluster, creating the cluster on first use.
    #[inline]
    pub fn push(&mut self, cluster: &str, item: T) {
        match self.groups.get_mut(cluster) {
            Some(items) => items.push(item),
            None => {
                self.groups.insert(cluster.to_string(), vec![item]);
            }
        }
    }

    /// Make sure a cluster exists, possibly with no items.
    pub fn ensure(&mut self, cluster: &str) {
        if !self.groups.contains_key(cluster) {
            self.groups.insert(cluster.to_string(), Vec::new());
        }
    }

    /// Items of one cluster, in append order.
    #[inline]
    pub fn get(&self, cluster: &str) -> Option<&[T]> {
        self.groups.get(cluster).map(Vec::as_slice)
    }

    /// Number of items in one cluster (0 if absent).
    #[inline]
    pub fn size_of(&self, cluster: &str) -> usize {
        self.groups.get(cluster).map_or(0, Vec::len)
    }

    #[inline]
    pub fn contains(&self, cluster: &str) -> bool {
        self.groups.contains_key(cluster)
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of items across all clusters.
    pub fn total_items(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Cluster names in first-seen order.
    pub fn clusters(&self) -> impl Iterator<Item = &ClusterId> {
        self.groups.keys()
    }

    /// Iterate `(cluster, items)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClusterId, &[T])> {
        self.groups
            .iter()
            .map(|(cluster, items)| (cluster, items.as_slice()))
    }

    /// Keep only the clusters for which `keep(cluster, items)` holds.
    /// Relative order of the surviving clusters is unchanged.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ClusterId, &[T]) -> bool,
    {
        self.groups.retain(|cluster, items| keep(cluster, items));
    }

    /// Stable sort of clusters by descending size.
    pub fn sort_by_size_desc(&mut self) {
        self.groups.sort_by(|_, a, _, b| b.len().cmp(&a.len()));
    }
}

impl<T> FromIterator<(ClusterId, T)> for ClusterGroups<T> {
    fn from_iter<I: IntoIterator<Item = (ClusterId, T)>>(iter: I) -> Self {
        let mut groups = ClusterGroups::new();
        for (cluster, item) in iter {
            groups.push(&cluster, item);
        }
        groups
    }
}

impl<T> IntoIterator for ClusterGroups<T> {
    type Item = (ClusterId, Vec<T>);
    type IntoIter = indexmap::map::IntoIter<ClusterId, Vec<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
