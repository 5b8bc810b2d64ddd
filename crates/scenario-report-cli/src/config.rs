//! Report configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults (`Baseline` / `Exog` / `EEMD`, lenient matching)
//! 2. An optional TOML file passed with `--config`
//! 3. Command-line flags
//!
//! ```toml
//! policy = "strict"
//!
//! [labels]
//! baseline = "Sales-Baseline"
//! exogenous = "Sales-Exog"
//! decomposition = "Sales-EEMD"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use scenario_report_core::{CompareError, MatchPolicy, Scenario, ScenarioLabels};
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub labels: ScenarioLabels,
    pub policy: MatchPolicy,
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub baseline: Option<String>,
    pub exogenous: Option<String>,
    pub decomposition: Option<String>,
    pub strict: bool,
}

impl ReportConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides, re-validating the resulting labels
    pub fn with_overrides(self, overrides: &Overrides) -> Result<Self, CompareError> {
        let pick = |given: &Option<String>, scenario: Scenario| {
            given
                .clone()
                .unwrap_or_else(|| self.labels.label(scenario).to_string())
        };
        let labels = ScenarioLabels::new(
            pick(&overrides.baseline, Scenario::Baseline),
            pick(&overrides.exogenous, Scenario::Exogenous),
            pick(&overrides.decomposition, Scenario::Decomposition),
        )?;
        let policy = if overrides.strict {
            MatchPolicy::Strict
        } else {
            self.policy
        };

        Ok(Self { labels, policy })
    }
}
