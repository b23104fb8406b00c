// Bounded module identification.
//
// Same merge selection as hierarchical clustering, but the run stops once
// the cluster count reaches floor(total_classes / 2), or as soon as the best
// candidate merge would produce a cluster whose average intra-cluster
// coupling is below the configured minimum. A rejected merge ends the run:
// every other pair is coupled no more strongly than the rejected one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::ClusterStore;
use crate::coupling::CouplingGraph;
use crate::error::Result;
use crate::observer::MergeObserver;
use crate::types::ClassName;

use super::{ClusteringOutcome, MergeStep, StopReason};

/// Average intra-cluster coupling of one final module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleCoupling {
    pub key: ClassName,
    pub size: usize,
    pub average: f64,
}

/// Agglomerative clustering with a module-count bound and a quality guard.
#[derive(Debug)]
pub struct ModuleIdentifier<'g> {
    graph: &'g CouplingGraph,
    clusters: ClusterStore,
    max_modules: usize,
    min_coupling_average: f64,
    step_budget: Option<usize>,
}

impl<'g> ModuleIdentifier<'g> {
    /// `total_classes` is taken as given (normally `graph.class_count()`);
    /// the module bound is `total_classes / 2`, rounded down.
    pub fn new(graph: &'g CouplingGraph, total_classes: usize, min_coupling_average: f64) -> Self {
        Self {
            graph,
            clusters: ClusterStore::singletons(graph),
            max_modules: total_classes / 2,
            min_coupling_average,
            step_budget: None,
        }
    }

    /// Stop after at most `budget` merges.
    #[must_use]
    pub fn with_step_budget(mut self, budget: Option<usize>) -> Self {
        self.step_budget = budget;
        self
    }

    pub fn max_modules(&self) -> usize {
        self.max_modules
    }

    pub fn min_coupling_average(&self) -> f64 {
        self.min_coupling_average
    }

    pub fn clusters(&self) -> &ClusterStore {
        &self.clusters
    }

    pub fn into_clusters(self) -> ClusterStore {
        self.clusters
    }

    /// Merge until the module bound, the quality guard, or a lack of
    /// coupling stops the run.
    pub fn identify(&mut self, observer: &dyn MergeObserver) -> Result<ClusteringOutcome> {
        info!(
            classes = self.clusters.len(),
            max_modules = self.max_modules,
            min_coupling_average = self.min_coupling_average,
            "Identifying modules"
        );

        let mut steps = Vec::new();
        let stop = loop {
            if self.clusters.len() <= self.max_modules {
                break StopReason::ModuleLimit {
                    max_modules: self.max_modules,
                };
            }
            if let Some(budget) = self.step_budget {
                if steps.len() >= budget {
                    break StopReason::StepBudget { budget };
                }
            }
            let Some(pair) = self.clusters.closest_pair(self.graph) else {
                break StopReason::NoCoupling;
            };

            let average = self.clusters.merged_average_coupling(
                self.graph,
                pair.keep.as_str(),
                pair.absorb.as_str(),
            );
            if average < self.min_coupling_average {
                debug!(
                    keep = %pair.keep,
                    absorb = %pair.absorb,
                    average,
                    minimum = self.min_coupling_average,
                    "Merge rejected by coupling guard"
                );
                break StopReason::BelowThreshold {
                    keep: pair.keep,
                    absorb: pair.absorb,
                    average,
                    minimum: self.min_coupling_average,
                };
            }

            let merged_size = self.clusters.merge(&pair.keep, &pair.absorb)?;
            let step = MergeStep {
                step: steps.len() + 1,
                kept: pair.keep,
                absorbed: pair.absorb,
                coupling: pair.coupling,
                merged_size,
                average: Some(average),
            };
            observer.on_merge(&step, &self.clusters);
            steps.push(step);
        };

        observer.on_stop(&stop, &self.clusters);
        info!(
            merges = steps.len(),
            modules = self.clusters.len(),
            "Module identification complete"
        );

        Ok(ClusteringOutcome { steps, stop })
    }

    /// Average intra-cluster coupling of every current cluster, by key.
    pub fn cluster_averages(&self) -> Vec<ModuleCoupling> {
        self.clusters
            .iter()
            .map(|(key, members)| ModuleCoupling {
                key: key.clone(),
                size: members.len(),
                average: self.clusters.average_coupling(self.graph, key.as_str()),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
