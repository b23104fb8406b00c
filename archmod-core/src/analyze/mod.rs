pub mod hierarchical;
pub mod modules;

use serde::{Deserialize, Serialize};

use crate::types::ClassName;

/// One committed merge, emitted to observers and kept in the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    /// 1-based step number.
    pub step: usize,
    pub kept: ClassName,
    pub absorbed: ClassName,
    /// Symmetric inter-cluster coupling that selected this pair.
    pub coupling: u64,
    pub merged_size: usize,
    /// Average intra-cluster coupling of the merged cluster, when the
    /// algorithm checks it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

/// Why a clustering run stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// At most one cluster remains.
    SingleCluster,
    /// No two clusters share positive coupling.
    NoCoupling,
    /// The cluster count reached the module bound.
    ModuleLimit { max_modules: usize },
    /// The best candidate merge would fall below the minimum average coupling.
    BelowThreshold {
        keep: ClassName,
        absorb: ClassName,
        average: f64,
        minimum: f64,
    },
    /// The configured merge step budget ran out.
    StepBudget { budget: usize },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleCluster => write!(f, "single cluster remaining"),
            Self::NoCoupling => write!(f, "no coupling left between clusters"),
            Self::ModuleLimit { max_modules } => {
                write!(f, "reached module limit of {max_modules}")
            }
            Self::BelowThreshold {
                keep,
                absorb,
                average,
                minimum,
            } => write!(
                f,
                "merging {keep} and {absorb} gives average coupling {average:.4}, below minimum {minimum}"
            ),
            Self::StepBudget { budget } => write!(f, "step budget of {budget} exhausted"),
        }
    }
}

/// Result of a clustering run: the merge trace and the stop condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    pub steps: Vec<MergeStep>,
    pub stop: StopReason,
}

impl ClusteringOutcome {
    pub fn merge_count(&self) -> usize {
        self.steps.len()
    }
}
