// Mutable cluster partition shared by the clustering algorithms.
//
// Averages cast pair counts to f64.
#![allow(clippy::cast_precision_loss)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::coupling::CouplingGraph;
use crate::error::ClusterError;
use crate::types::ClassName;

/// Two live clusters and the symmetric coupling between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePair {
    /// Lexicographically smaller key; survives the merge.
    pub keep: ClassName,
    /// Key removed by the merge.
    pub absorb: ClassName,
    pub coupling: u64,
}

/// A partition of classes into clusters, keyed by a representative class.
///
/// Starts as one singleton per class and only ever shrinks by merging, so
/// the union of all clusters is fixed for the lifetime of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterStore {
    clusters: BTreeMap<ClassName, BTreeSet<ClassName>>,
}

impl ClusterStore {
    /// One singleton cluster for every class key of `graph`.
    pub fn singletons(graph: &CouplingGraph) -> Self {
        let clusters = graph
            .classes()
            .map(|class| (class.clone(), BTreeSet::from([class.clone()])))
            .collect();
        Self { clusters }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ClassName> {
        self.clusters.keys()
    }

    pub fn members(&self, key: &str) -> Option<&BTreeSet<ClassName>> {
        self.clusters.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassName, &BTreeSet<ClassName>)> {
        self.clusters.iter()
    }

    /// Number of classes across all clusters.
    pub fn class_count(&self) -> usize {
        self.clusters.values().map(BTreeSet::len).sum()
    }

    /// Member sets ordered by cluster key.
    pub fn partition(&self) -> Vec<BTreeSet<ClassName>> {
        self.clusters.values().cloned().collect()
    }

    /// Move every member of `absorb` into `keep` and drop the `absorb` entry.
    /// Returns the size of the merged cluster.
    pub fn merge(&mut self, keep: &ClassName, absorb: &ClassName) -> Result<usize, ClusterError> {
        if keep == absorb {
            return Err(ClusterError::SelfMerge(keep.to_string()));
        }
        if !self.clusters.contains_key(keep) {
            return Err(ClusterError::UnknownCluster(keep.to_string()));
        }
        let absorbed = self
            .clusters
            .remove(absorb)
            .ok_or_else(|| ClusterError::UnknownCluster(absorb.to_string()))?;

        let merged = self
            .clusters
            .get_mut(keep)
            .ok_or_else(|| ClusterError::UnknownCluster(keep.to_string()))?;
        merged.extend(absorbed);
        Ok(merged.len())
    }

    /// Total coupling between two clusters, counting both directions.
    pub fn inter_cluster_coupling(&self, graph: &CouplingGraph, a: &str, b: &str) -> u64 {
        let (Some(left), Some(right)) = (self.clusters.get(a), self.clusters.get(b)) else {
            return 0;
        };
        left.iter()
            .flat_map(|x| right.iter().map(move |y| (x, y)))
            .map(|(x, y)| {
                graph.weight(x.as_str(), y.as_str()) + graph.weight(y.as_str(), x.as_str())
            })
            .sum()
    }

    /// The most-coupled pair of distinct clusters.
    ///
    /// Pairs are scanned in lexicographic key order and only a strictly
    /// greater coupling replaces the current best, so ties resolve to the
    /// first pair in that order. Returns `None` when fewer than two clusters
    /// remain or no pair has positive coupling.
    pub fn closest_pair(&self, graph: &CouplingGraph) -> Option<CandidatePair> {
        let keys: Vec<&ClassName> = self.clusters.keys().collect();
        let mut best: Option<(usize, usize, u64)> = None;

        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate().skip(i + 1) {
                let coupling = self.inter_cluster_coupling(graph, a.as_str(), b.as_str());
                if best.is_none_or(|(_, _, max)| coupling > max) {
                    best = Some((i, j, coupling));
                }
            }
        }

        match best {
            Some((i, j, coupling)) if coupling > 0 => Some(CandidatePair {
                keep: keys[i].clone(),
                absorb: keys[j].clone(),
                coupling,
            }),
            _ => None,
        }
    }

    /// Average intra-cluster coupling of the cluster at `key`.
    pub fn average_coupling(&self, graph: &CouplingGraph, key: &str) -> f64 {
        self.clusters
            .get(key)
            .map_or(0.0, |members| average_coupling(graph, members.iter()))
    }

    /// Average intra-cluster coupling the union of `a` and `b` would have.
    pub fn merged_average_coupling(&self, graph: &CouplingGraph, a: &str, b: &str) -> f64 {
        let merged: BTreeSet<&ClassName> = self
            .clusters
            .get(a)
            .into_iter()
            .chain(self.clusters.get(b))
            .flatten()
            .collect();
        average_coupling(graph, merged.iter().copied())
    }
}

/// Mean of `weight(x → y)` over every ordered pair of distinct members.
/// Zero for fewer than two members.
pub fn average_coupling<'a>(
    graph: &CouplingGraph,
    members: impl Iterator<Item = &'a ClassName> + Clone,
) -> f64 {
    let mut total = 0u64;
    let mut pairs = 0u64;

    for x in members.clone() {
        for y in members.clone() {
            if x != y {
                total += graph.weight(x.as_str(), y.as_str());
                pairs += 1;
            }
        }
    }

    if pairs == 0 {
        return 0.0;
    }
    total as f64 / pairs as f64
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str, u64)], extra: &[&str]) -> CouplingGraph {
        let mut g = CouplingGraph::new();
        for &(from, to, w) in edges {
            for _ in 0..w {
                g.record_call(&from.into(), &to.into());
            }
        }
        for &class in extra {
            g.ensure_class(&class.into());
        }
        g
    }

    #[test]
    fn singletons_cover_every_class() {
        let g = graph(&[("A", "B", 2)], &["C"]);
        let store = ClusterStore::singletons(&g);
        assert_eq!(store.len(), 3);
        assert_eq!(store.class_count(), 3);
        assert_eq!(store.members("C").map(BTreeSet::len), Some(1));
    }

    #[test]
    fn merge_moves_members_and_drops_key() {
        let g = graph(&[("A", "B", 1)], &["C"]);
        let mut store = ClusterStore::singletons(&g);

        let size = store.merge(&"A".into(), &"B".into()).unwrap();
        assert_eq!(size, 2);
        assert_eq!(store.len(), 2);
        assert!(store.members("B").is_none());
        assert_eq!(store.class_count(), 3);
    }

    #[test]
    fn merge_rejects_self_and_unknown() {
        let g = graph(&[("A", "B", 1)], &[]);
        let mut store = ClusterStore::singletons(&g);

        assert_eq!(
            store.merge(&"A".into(), &"A".into()),
            Err(ClusterError::SelfMerge("A".into()))
        );
        assert_eq!(
            store.merge(&"A".into(), &"Z".into()),
            Err(ClusterError::UnknownCluster("Z".into()))
        );
        assert_eq!(
            store.merge(&"Z".into(), &"A".into()),
            Err(ClusterError::UnknownCluster("Z".into()))
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn inter_cluster_coupling_is_symmetric_sum() {
        let g = graph(&[("A", "C", 2), ("C", "B", 3), ("B", "A", 7)], &[]);
        let mut store = ClusterStore::singletons(&g);
        store.merge(&"A".into(), &"B".into()).unwrap();

        assert_eq!(store.inter_cluster_coupling(&g, "A", "C"), 5);
        assert_eq!(store.inter_cluster_coupling(&g, "C", "A"), 5);
        assert_eq!(store.inter_cluster_coupling(&g, "A", "missing"), 0);
    }

    #[test]
    fn closest_pair_picks_strongest() {
        let g = graph(&[("A", "B", 1), ("C", "B", 4), ("B", "C", 1)], &[]);
        let store = ClusterStore::singletons(&g);

        let pair = store.closest_pair(&g).unwrap();
        assert_eq!(pair.keep.as_str(), "B");
        assert_eq!(pair.absorb.as_str(), "C");
        assert_eq!(pair.coupling, 5);
    }

    #[test]
    fn closest_pair_ties_go_to_first_in_key_order() {
        let g = graph(&[("C", "D", 3), ("A", "B", 3)], &[]);
        let store = ClusterStore::singletons(&g);

        let pair = store.closest_pair(&g).unwrap();
        assert_eq!((pair.keep.as_str(), pair.absorb.as_str()), ("A", "B"));
    }

    #[test]
    fn closest_pair_none_without_coupling() {
        let g = graph(&[], &["A", "B", "C"]);
        assert!(ClusterStore::singletons(&g).closest_pair(&g).is_none());

        let single = graph(&[], &["A"]);
        assert!(ClusterStore::singletons(&single).closest_pair(&single).is_none());
    }

    #[test]
    fn average_coupling_over_ordered_pairs() {
        // A→B 4, B→A 2, A→C 0 ... 6 ordered pairs over {A,B,C}
        let g = graph(&[("A", "B", 4), ("B", "A", 2)], &["C"]);
        let mut store = ClusterStore::singletons(&g);

        assert!((store.merged_average_coupling(&g, "A", "B") - 3.0).abs() < 1e-12);
        assert_eq!(store.average_coupling(&g, "A"), 0.0);

        store.merge(&"A".into(), &"B".into()).unwrap();
        assert!((store.average_coupling(&g, "A") - 3.0).abs() < 1e-12);
        assert!((store.merged_average_coupling(&g, "A", "C") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn average_coupling_of_unknown_is_zero() {
        let g = graph(&[("A", "B", 1)], &[]);
        let store = ClusterStore::singletons(&g);
        assert_eq!(store.average_coupling(&g, "nope"), 0.0);
        assert_eq!(store.merged_average_coupling(&g, "nope", "none"), 0.0);
    }
}
