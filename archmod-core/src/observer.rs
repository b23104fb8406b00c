//! Observation of clustering runs.
//!
//! Merge steps are reported to a [`MergeObserver`] as they are committed.
//! The CLI uses `IndicatifObserver` for a live spinner; library callers can
//! use `NoopObserver`, `TracingObserver`, or provide their own implementation.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::analyze::{MergeStep, StopReason};
use crate::cluster::ClusterStore;

/// Receives merge steps and the final stop condition of a clustering run.
pub trait MergeObserver {
    /// A merge was committed; `clusters` is the partition after the merge.
    fn on_merge(&self, step: &MergeStep, clusters: &ClusterStore);

    /// The run stopped.
    fn on_stop(&self, reason: &StopReason, clusters: &ClusterStore);
}

/// No-op observer for callers that only need the outcome.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {
    fn on_merge(&self, _step: &MergeStep, _clusters: &ClusterStore) {}
    fn on_stop(&self, _reason: &StopReason, _clusters: &ClusterStore) {}
}

/// Emits one structured `tracing` event per merge and one on stop.
#[derive(Debug, Default)]
pub struct TracingObserver {
    label: &'static str,
}

impl TracingObserver {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl MergeObserver for TracingObserver {
    fn on_merge(&self, step: &MergeStep, clusters: &ClusterStore) {
        debug!(
            run = self.label,
            step = step.step,
            kept = %step.kept,
            absorbed = %step.absorbed,
            coupling = step.coupling,
            average = ?step.average,
            remaining = clusters.len(),
            "Merged clusters"
        );
    }

    fn on_stop(&self, reason: &StopReason, clusters: &ClusterStore) {
        info!(
            run = self.label,
            clusters = clusters.len(),
            %reason,
            "Clustering stopped"
        );
    }
}

/// Spinner backed by `indicatif` for CLI use.
#[derive(Debug)]
pub struct IndicatifObserver {
    bar: ProgressBar,
}

impl IndicatifObserver {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {prefix}: {msg}") {
            bar.set_style(style);
        }
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl MergeObserver for IndicatifObserver {
    fn on_merge(&self, step: &MergeStep, clusters: &ClusterStore) {
        self.bar.set_message(format!(
            "step {}: {} + {} ({} clusters left)",
            step.step,
            step.kept,
            step.absorbed,
            clusters.len()
        ));
        self.bar.tick();
    }

    fn on_stop(&self, reason: &StopReason, _clusters: &ClusterStore) {
        self.bar.finish_with_message(reason.to_string());
    }
}

/// Forwards every event to each observer in order.
#[derive(Default)]
pub struct FanoutObserver<'a> {
    observers: Vec<&'a dyn MergeObserver>,
}

impl std::fmt::Debug for FanoutObserver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<'a> FanoutObserver<'a> {
    pub fn new(observers: Vec<&'a dyn MergeObserver>) -> Self {
        Self { observers }
    }
}

impl MergeObserver for FanoutObserver<'_> {
    fn on_merge(&self, step: &MergeStep, clusters: &ClusterStore) {
        for observer in &self.observers {
            observer.on_merge(step, clusters);
        }
    }

    fn on_stop(&self, reason: &StopReason, clusters: &ClusterStore) {
        for observer in &self.observers {
            observer.on_stop(reason, clusters);
        }
    }
}
