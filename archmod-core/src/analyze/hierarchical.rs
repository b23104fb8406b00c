// Unbounded agglomerative clustering over a class coupling graph.
//
// Each step merges the two clusters with the greatest symmetric coupling,
// until one cluster is left or no pair shares any coupling. The merge scan
// is all-pairs per step, O(k³) over a full run on k classes.

use tracing::info;

use crate::cluster::ClusterStore;
use crate::coupling::CouplingGraph;
use crate::error::Result;
use crate::observer::MergeObserver;

use super::{ClusteringOutcome, MergeStep, StopReason};

/// Greedy hierarchical clustering that owns its cluster partition.
#[derive(Debug)]
pub struct HierarchicalClustering<'g> {
    graph: &'g CouplingGraph,
    clusters: ClusterStore,
    step_budget: Option<usize>,
}

impl<'g> HierarchicalClustering<'g> {
    /// Start from one singleton cluster per class of `graph`.
    pub fn new(graph: &'g CouplingGraph) -> Self {
        Self {
            graph,
            clusters: ClusterStore::singletons(graph),
            step_budget: None,
        }
    }

    /// Stop after at most `budget` merges.
    #[must_use]
    pub fn with_step_budget(mut self, budget: Option<usize>) -> Self {
        self.step_budget = budget;
        self
    }

    pub fn clusters(&self) -> &ClusterStore {
        &self.clusters
    }

    pub fn into_clusters(self) -> ClusterStore {
        self.clusters
    }

    /// Merge until a single cluster remains or coupling runs out.
    pub fn run(&mut self, observer: &dyn MergeObserver) -> Result<ClusteringOutcome> {
        info!(
            classes = self.clusters.len(),
            edges = self.graph.edge_count(),
            "Running hierarchical clustering"
        );

        let mut steps = Vec::new();
        let stop = loop {
            if self.clusters.len() <= 1 {
                break StopReason::SingleCluster;
            }
            if let Some(budget) = self.step_budget {
                if steps.len() >= budget {
                    break StopReason::StepBudget { budget };
                }
            }
            let Some(pair) = self.clusters.closest_pair(self.graph) else {
                break StopReason::NoCoupling;
            };

            let merged_size = self.clusters.merge(&pair.keep, &pair.absorb)?;
            let step = MergeStep {
                step: steps.len() + 1,
                kept: pair.keep,
                absorbed: pair.absorb,
                coupling: pair.coupling,
                merged_size,
                average: None,
            };
            observer.on_merge(&step, &self.clusters);
            steps.push(step);
        };

        observer.on_stop(&stop, &self.clusters);
        info!(
            merges = steps.len(),
            clusters = self.clusters.len(),
            "Hierarchical clustering complete"
        );

        Ok(ClusteringOutcome { steps, stop })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
