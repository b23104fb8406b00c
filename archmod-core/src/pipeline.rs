// Analysis orchestrator: CallGraph → CouplingGraph → clustering + modules.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyze::ClusteringOutcome;
use crate::analyze::hierarchical::HierarchicalClustering;
use crate::analyze::modules::{ModuleCoupling, ModuleIdentifier};
use crate::call_graph::{CallGraph, CallGraphStats};
use crate::cluster::ClusterStore;
use crate::config::ArchmodConfig;
use crate::coupling::{CouplingCalculator, CouplingEdge, CouplingGraph};
use crate::error::Result;
use crate::observer::MergeObserver;
use crate::types::ClassName;

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stats: CallGraphStats,
    pub classes: Vec<ClassName>,
    pub coupling: Vec<CouplingEdge>,
    pub hierarchical: PartitionReport,
    pub modules: ModuleReport,
    #[serde(skip)]
    pub duration: Duration,
}

/// Outcome and final partition of the unbounded clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionReport {
    pub outcome: ClusteringOutcome,
    pub clusters: Vec<BTreeSet<ClassName>>,
}

/// Outcome, module bound, and per-module coupling of the bounded run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    pub max_modules: usize,
    pub min_coupling_average: f64,
    pub outcome: ClusteringOutcome,
    pub modules: Vec<ModuleCoupling>,
    pub clusters: Vec<BTreeSet<ClassName>>,
}

/// Intermediate results kept for renderers that need live state.
#[derive(Debug)]
pub struct Analysis {
    pub coupling_graph: CouplingGraph,
    pub clusters: ClusterStore,
    pub modules: ClusterStore,
    pub report: AnalysisReport,
}

/// Run hierarchical clustering over a coupling graph.
pub fn cluster(
    graph: &CouplingGraph,
    config: &ArchmodConfig,
    observer: &dyn MergeObserver,
) -> Result<(ClusteringOutcome, ClusterStore)> {
    let mut clustering =
        HierarchicalClustering::new(graph).with_step_budget(config.analysis.step_budget);
    let outcome = clustering.run(observer)?;
    Ok((outcome, clustering.into_clusters()))
}

/// Run module identification over a coupling graph.
pub fn identify_modules(
    graph: &CouplingGraph,
    config: &ArchmodConfig,
    observer: &dyn MergeObserver,
) -> Result<(ModuleReport, ClusterStore)> {
    let total_classes = config
        .analysis
        .total_classes
        .unwrap_or_else(|| graph.class_count());
    let mut identifier =
        ModuleIdentifier::new(graph, total_classes, config.analysis.min_coupling_average)
            .with_step_budget(config.analysis.step_budget);
    let outcome = identifier.identify(observer)?;

    let report = ModuleReport {
        max_modules: identifier.max_modules(),
        min_coupling_average: identifier.min_coupling_average(),
        outcome,
        modules: identifier.cluster_averages(),
        clusters: identifier.clusters().partition(),
    };
    Ok((report, identifier.into_clusters()))
}

/// Full analysis of a call graph. Both clustering runs start from their own
/// singleton partition of the same coupling graph.
pub fn run_analysis(
    call_graph: &CallGraph,
    config: &ArchmodConfig,
    observer: &dyn MergeObserver,
) -> Result<Analysis> {
    config.validate()?;
    let start = Instant::now();

    let stats = call_graph.stats();
    info!(
        methods = stats.methods,
        edges = stats.edges,
        unresolved = stats.unresolved_edges,
        "Building coupling graph"
    );
    let coupling_graph = CouplingCalculator::new(call_graph).weighted_coupling();

    let (outcome, clusters) = cluster(&coupling_graph, config, observer)?;
    let (modules_report, modules) = identify_modules(&coupling_graph, config, observer)?;

    let report = AnalysisReport {
        stats,
        classes: coupling_graph.classes().cloned().collect(),
        coupling: coupling_graph.edge_list(),
        hierarchical: PartitionReport {
            outcome,
            clusters: clusters.partition(),
        },
        modules: modules_report,
        duration: start.elapsed(),
    };

    info!(
        classes = report.classes.len(),
        clusters = report.hierarchical.clusters.len(),
        modules = report.modules.clusters.len(),
        duration = ?report.duration,
        "Analysis complete"
    );

    Ok(Analysis {
        coupling_graph,
        clusters,
        modules,
        report,
    })
}
