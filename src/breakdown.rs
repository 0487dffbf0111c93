//! Per-cluster breakdown of genes by taxonomic unit (mOTU) label.

use crate::gene::GeneId;
use crate::groups::ClusterGroups;
use crate::membership::Result;
use crate::payload::Payload;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Gene -> label assignments, one label per gene (last write wins).
#[derive(Debug, Clone, Default)]
pub struct UnitLabels {
    by_gene: FxHashMap<GeneId, String>,
    labels: BTreeSet<String>,
}

impl UnitLabels {
    /// Collect labels from a `(gene, label)` source.
    pub fn from_source<I>(source: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(GeneId, String)>>,
    {
        let mut units = UnitLabels::default();
        for row in source {
            let (gene, label) = row?;
            units.insert(gene, label);
        }
        Ok(units)
    }

    pub fn insert(&mut self, gene: GeneId, label: String) {
        if !self.labels.contains(&label) {
            self.labels.insert(label.clone());
        }
        self.by_gene.insert(gene, label);
    }

    #[inline]
    pub fn label_of(&self, gene: &GeneId) -> Option<&str> {
        self.by_gene.get(gene).map(String::as_str)
    }

    /// Every label seen in the source, sorted.
    ///
    /// A label stays listed even if all its genes were later relabelled.
    pub fn labels(&self) -> impl Iterator<Item = &String> {
        self.labels.iter()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn num_genes(&self) -> usize {
        self.by_gene.len()
    }

    /// Break every cluster down by label.
    ///
    /// Each cluster gets one entry per known label, in label order, listing
    /// its labelled genes in membership order. Unlabelled genes are left
    /// out.
    pub fn breakdown(&self, members: &ClusterGroups<GeneId>) -> ClusterGroups<Payload> {
        let mut groups = ClusterGroups::new();

        for (cluster, genes) in members.iter() {
            let mut by_label: FxHashMap<&str, Vec<GeneId>> = FxHashMap::default();
            for gene in genes {
                if let Some(label) = self.label_of(gene) {
                    by_label.entry(label).or_default().push(gene.clone());
                }
            }

            groups.ensure(cluster);
            for label in &self.labels {
                groups.push(
                    cluster,
                    Payload::Units {
                        label: label.clone(),
                        genes: by_label.remove(label.as_str()).unwrap_or_default(),
                    },
                );
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::KeyMode;
    use crate::index::MembershipIndex;
    use crate::sources::TaxonomicUnitReader;

    fn labels(content: &str) -> UnitLabels {
        UnitLabels::from_source(TaxonomicUnitReader::new(content.as_bytes()).labels()).unwrap()
    }

    fn rendered(groups: &ClusterGroups<Payload>, cluster: &str) -> Vec<String> {
        groups
            .get(cluster)
            .unwrap()
            .iter()
            .map(|p| p.to_text(""))
            .collect()
    }

    #[test]
    fn test_breakdown_lists_every_label() {
        let units = labels("g1\tm2\ng2\tm1\ng3 x m2\ng9\tm3\n");
        let members = MembershipIndex::parse("c1\tg3\nc1\tg1\nc1\tg4\nc2\tg2\n", KeyMode::Name)
            .unwrap()
            .into_cluster_to_genes();

        let groups = units.breakdown(&members);

        assert_eq!(rendered(&groups, "c1"), vec!["m1=\n", "m2=g3,g1\n", "m3=\n"]);
        assert_eq!(rendered(&groups, "c2"), vec!["m1=g2\n", "m2=\n", "m3=\n"]);
    }

    #[test]
    fn test_last_label_wins() {
        let units = labels("g1\tm1\ng1\tm2\n");
        assert_eq!(units.label_of(&GeneId::name("g1")), Some("m2"));
        assert_eq!(units.num_genes(), 1);
        // m1 is still a known label
        assert_eq!(units.num_labels(), 2);
    }

    #[test]
    fn test_no_labels_keeps_cluster() {
        let units = UnitLabels::default();
        let members = MembershipIndex::parse("c1\tg1\n", KeyMode::Name)
            .unwrap()
            .into_cluster_to_genes();

        let groups = units.breakdown(&members);
        assert!(groups.contains("c1"));
        assert_eq!(groups.size_of("c1"), 0);
    }
}
