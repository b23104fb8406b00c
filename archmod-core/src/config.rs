use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level archmod configuration, matching `archmod.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchmodConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Minimum average intra-cluster coupling a module merge must keep.
    pub min_coupling_average: f64,
    /// Class count used for the module bound; defaults to the coupling
    /// graph's class count.
    pub total_classes: Option<usize>,
    /// Maximum merges per clustering run. Unlimited when unset.
    pub step_budget: Option<usize>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            min_coupling_average: 1.0,
            total_classes: None,
            step_budget: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Emit node statements for classes without edges in DOT output.
    pub include_isolated: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            include_isolated: true,
        }
    }
}

impl ArchmodConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.analysis.min_coupling_average;
        if !min.is_finite() || min < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_coupling_average must be a non-negative number, got {min}"
            )));
        }
        if self.analysis.step_budget == Some(0) {
            return Err(ConfigError::Invalid(
                "step_budget must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
