//! # scenario-report-core
//!
//! Core domain model for forecast scenario comparison reports.
//!
//! This crate provides:
//! - Domain types: `Metric`, `Scenario`, `ScenarioLabels`, `MetricRecord`
//! - Record keying: `(bare model name, scenario)` pairs via [`keys`]
//! - Improvement arithmetic via [`improvement`]
//! - Comparison tables and the per-metric cache via [`comparison`]
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use scenario_report_core::{Metric, MetricRecord, ScenarioLabels};
//! use scenario_report_core::comparison::build_comparison_table;
//!
//! let labels = ScenarioLabels::new("Base", "Exog", "EEMD").unwrap();
//! let records = vec![
//!     MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 10.0),
//!     MetricRecord::new("ARIMA-Exog").with(Metric::Rmse, 8.0),
//! ];
//!
//! let table = build_comparison_table(&records, Metric::Rmse, &labels);
//! assert_eq!(table.rows()[0].exogenous_display(), "8.000 (+20.0%)");
//! ```

pub mod comparison;
pub mod improvement;
pub mod keys;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::comparison::ComparisonSet;

// ============================================================================
// Metrics
// ============================================================================

/// Whether a larger metric value is an improvement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// Evaluation metric reported per model and scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Rmse,
    Mae,
    Mape,
    R2,
    Aic,
    Bic,
}

impl Metric {
    /// All metrics, in report order
    pub const ALL: [Metric; 6] = [
        Metric::Rmse,
        Metric::Mae,
        Metric::Mape,
        Metric::R2,
        Metric::Aic,
        Metric::Bic,
    ];

    /// Canonical column and sheet name
    pub const fn name(self) -> &'static str {
        match self {
            Metric::Rmse => "RMSE",
            Metric::Mae => "MAE",
            Metric::Mape => "MAPE",
            Metric::R2 => "R2",
            Metric::Aic => "AIC",
            Metric::Bic => "BIC",
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Metric::R2 => Direction::HigherIsBetter,
            _ => Direction::LowerIsBetter,
        }
    }

    /// Position in [`Metric::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CompareError::UnknownMetric(s.to_string()))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

/// Experimental condition a model was evaluated under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scenario {
    Baseline,
    Exogenous,
    Decomposition,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Baseline,
        Scenario::Exogenous,
        Scenario::Decomposition,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Baseline => "baseline",
            Scenario::Exogenous => "exogenous",
            Scenario::Decomposition => "decomposition",
        };
        f.write_str(name)
    }
}

/// Labels that tag a model name with its scenario, e.g. `ARIMA-Exog`.
///
/// No label may be empty and no label may contain another one, so every
/// `Model` string ends with at most one `-<label>` suffix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLabels")]
pub struct ScenarioLabels {
    baseline: String,
    exogenous: String,
    decomposition: String,
}

#[derive(Deserialize)]
struct RawLabels {
    baseline: String,
    exogenous: String,
    decomposition: String,
}

impl TryFrom<RawLabels> for ScenarioLabels {
    type Error = CompareError;

    fn try_from(raw: RawLabels) -> Result<Self, Self::Error> {
        Self::new(raw.baseline, raw.exogenous, raw.decomposition)
    }
}

impl ScenarioLabels {
    pub fn new(
        baseline: impl Into<String>,
        exogenous: impl Into<String>,
        decomposition: impl Into<String>,
    ) -> Result<Self, CompareError> {
        let labels = Self {
            baseline: baseline.into(),
            exogenous: exogenous.into(),
            decomposition: decomposition.into(),
        };
        labels.validate()?;
        Ok(labels)
    }

    fn validate(&self) -> Result<(), CompareError> {
        for scenario in Scenario::ALL {
            if self.label(scenario).trim().is_empty() {
                return Err(CompareError::InvalidLabels(format!(
                    "{scenario} label is empty"
                )));
            }
        }
        for outer in Scenario::ALL {
            for inner in Scenario::ALL {
                if outer != inner && self.label(outer).contains(self.label(inner)) {
                    return Err(CompareError::InvalidLabels(format!(
                        "{outer} label '{}' contains {inner} label '{}'",
                        self.label(outer),
                        self.label(inner)
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn label(&self, scenario: Scenario) -> &str {
        match scenario {
            Scenario::Baseline => &self.baseline,
            Scenario::Exogenous => &self.exogenous,
            Scenario::Decomposition => &self.decomposition,
        }
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn exogenous(&self) -> &str {
        &self.exogenous
    }

    pub fn decomposition(&self) -> &str {
        &self.decomposition
    }
}

impl Default for ScenarioLabels {
    fn default() -> Self {
        Self {
            baseline: "Baseline".into(),
            exogenous: "Exog".into(),
            decomposition: "EEMD".into(),
        }
    }
}

// ============================================================================
// Input Records
// ============================================================================

/// One row of the evaluation results table.
///
/// Field names follow the column headers of the results table, so the same
/// type deserializes from CSV and JSON. Missing cells become `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "RMSE", default)]
    pub rmse: Option<f64>,
    #[serde(rename = "MAE", default)]
    pub mae: Option<f64>,
    #[serde(rename = "MAPE", default)]
    pub mape: Option<f64>,
    #[serde(rename = "R2", default)]
    pub r2: Option<f64>,
    #[serde(rename = "AIC", default)]
    pub aic: Option<f64>,
    #[serde(rename = "BIC", default)]
    pub bic: Option<f64>,
}

impl MetricRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set one metric value
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        *self.slot(metric) = Some(value);
        self
    }

    /// Value for a metric; NaN counts as missing
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::Rmse => self.rmse,
            Metric::Mae => self.mae,
            Metric::Mape => self.mape,
            Metric::R2 => self.r2,
            Metric::Aic => self.aic,
            Metric::Bic => self.bic,
        };
        value.filter(|v| !v.is_nan())
    }

    fn slot(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Rmse => &mut self.rmse,
            Metric::Mae => &mut self.mae,
            Metric::Mape => &mut self.mape,
            Metric::R2 => &mut self.r2,
            Metric::Aic => &mut self.aic,
            Metric::Bic => &mut self.bic,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// What went wrong while keying a record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// `Model` does not end with `-<label>` or has an empty model name
    MalformedModel,
    /// Second record for the same model and scenario
    DuplicateModel,
    /// Model has exogenous or decomposition results but no baseline
    UnmatchedModel,
}

impl DiagnosticCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::MalformedModel => "W001",
            DiagnosticCode::DuplicateModel => "W002",
            DiagnosticCode::UnmatchedModel => "W003",
        }
    }
}

/// A record-level finding collected while keying the input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// The offending `Model` string
    pub model: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            model: model.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.as_str(), self.model, self.message)
    }
}

/// How record-level diagnostics are treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Log diagnostics as warnings and skip the affected records
    #[default]
    Lenient,
    /// Fail on the first diagnostic
    Strict,
}

// ============================================================================
// Traits
// ============================================================================

/// Renders a set of comparison tables to an output format
pub trait Renderer {
    type Output;

    fn render(&self, comparisons: &ComparisonSet) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Comparison error
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CompareError {
    #[error("Invalid scenario labels: {0}")]
    InvalidLabels(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Rejected record {0}")]
    Rejected(Diagnostic),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Compare(#[from] CompareError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_order_and_names() {
        let names: Vec<_> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["RMSE", "MAE", "MAPE", "R2", "AIC", "BIC"]);
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn only_r2_is_higher_is_better() {
        for metric in Metric::ALL {
            let expected = if metric == Metric::R2 {
                Direction::HigherIsBetter
            } else {
                Direction::LowerIsBetter
            };
            assert_eq!(metric.direction(), expected, "{metric}");
        }
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("rmse".parse::<Metric>().unwrap(), Metric::Rmse);
        assert_eq!(" R2 ".parse::<Metric>().unwrap(), Metric::R2);
        assert!(matches!(
            "SMAPE".parse::<Metric>(),
            Err(CompareError::UnknownMetric(_))
        ));
    }

    #[test]
    fn record_builder_and_nan_as_missing() {
        let record = MetricRecord::new("ARIMA-Base")
            .with(Metric::Rmse, 1.5)
            .with(Metric::R2, f64::NAN);

        assert_eq!(record.value(Metric::Rmse), Some(1.5));
        assert_eq!(record.value(Metric::R2), None);
        assert_eq!(record.value(Metric::Bic), None);
    }

    #[test]
    fn record_deserializes_from_column_names() {
        let json = r#"{"Model": "ARIMA-Exog", "RMSE": 8.0, "R2": null}"#;
        let record: MetricRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.model, "ARIMA-Exog");
        assert_eq!(record.rmse, Some(8.0));
        assert_eq!(record.r2, None);
        assert_eq!(record.aic, None);
    }

    #[test]
    fn labels_default() {
        let labels = ScenarioLabels::default();
        assert_eq!(labels.baseline(), "Baseline");
        assert_eq!(labels.exogenous(), "Exog");
        assert_eq!(labels.decomposition(), "EEMD");
        assert_eq!(labels.label(Scenario::Decomposition), "EEMD");
    }

    #[test]
    fn labels_reject_empty() {
        let err = ScenarioLabels::new("", "Exog", "EEMD").unwrap_err();
        assert!(err.to_string().contains("baseline label is empty"));
    }

    #[test]
    fn labels_reject_containment() {
        let err = ScenarioLabels::new("Base", "BaseExog", "EEMD").unwrap_err();
        assert!(matches!(err, CompareError::InvalidLabels(_)));

        assert!(ScenarioLabels::new("EEMD", "Exog", "EEMD").is_err());
    }

    #[test]
    fn labels_may_contain_delimiter() {
        let labels = ScenarioLabels::new("Sales-Baseline", "Sales-Exog", "Sales-EEMD").unwrap();
        assert_eq!(labels.baseline(), "Sales-Baseline");
    }

    #[test]
    fn labels_validate_on_deserialize() {
        let ok: Result<ScenarioLabels, _> = serde_json::from_str(
            r#"{"baseline": "Base", "exogenous": "Exog", "decomposition": "EEMD"}"#,
        );
        assert!(ok.is_ok());

        let bad: Result<ScenarioLabels, _> = serde_json::from_str(
            r#"{"baseline": "Exog", "exogenous": "Exog", "decomposition": "EEMD"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic::new(DiagnosticCode::UnmatchedModel, "LSTM-Exog", "no baseline");
        assert_eq!(diag.to_string(), "[W003] LSTM-Exog: no baseline");
    }

    #[test]
    fn render_error_display() {
        let err = RenderError::Format("bad sheet".into());
        assert!(err.to_string().contains("bad sheet"));

        let err: RenderError = CompareError::InvalidLabels("x".into()).into();
        assert!(err.to_string().contains("Invalid scenario labels"));
    }
}
