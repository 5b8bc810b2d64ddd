//! Per-metric comparison tables.
//!
//! A [`ComparisonTable`] reshapes the flat result rows for one metric into one
//! row per baseline model, with the exogenous and decomposition results next
//! to it. [`ComparisonSet`] holds the tables of all six metrics, built once.

use tracing::debug;

use crate::improvement::{compute_improvement, format_value, mean_present};
use crate::keys::ScenarioIndex;
use crate::{CompareError, Diagnostic, MatchPolicy, Metric, MetricRecord, Scenario, ScenarioLabels};

/// One model's results for one metric across the three scenarios
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    /// Bare model name
    pub model: String,
    pub baseline: Option<f64>,
    pub exogenous: Option<f64>,
    pub decomposition: Option<f64>,
    /// Improvement of the exogenous scenario over baseline, in percent
    pub exog_improvement: Option<f64>,
    /// Improvement of the decomposition scenario over baseline, in percent
    pub eemd_improvement: Option<f64>,
}

impl ComparisonRow {
    pub fn new(
        model: impl Into<String>,
        metric: Metric,
        baseline: Option<f64>,
        exogenous: Option<f64>,
        decomposition: Option<f64>,
    ) -> Self {
        Self {
            model: model.into(),
            baseline,
            exogenous,
            decomposition,
            exog_improvement: compute_improvement(baseline, exogenous, metric),
            eemd_improvement: compute_improvement(baseline, decomposition, metric),
        }
    }

    pub fn value(&self, scenario: Scenario) -> Option<f64> {
        match scenario {
            Scenario::Baseline => self.baseline,
            Scenario::Exogenous => self.exogenous,
            Scenario::Decomposition => self.decomposition,
        }
    }

    /// Improvement over baseline; always `None` for the baseline itself
    pub fn improvement(&self, scenario: Scenario) -> Option<f64> {
        match scenario {
            Scenario::Baseline => None,
            Scenario::Exogenous => self.exog_improvement,
            Scenario::Decomposition => self.eemd_improvement,
        }
    }

    /// Display string for a scenario cell, e.g. `8.000 (+20.0%)` or `N/A`
    pub fn display(&self, scenario: Scenario) -> String {
        format_value(self.value(scenario), self.improvement(scenario))
    }

    pub fn baseline_display(&self) -> String {
        self.display(Scenario::Baseline)
    }

    pub fn exogenous_display(&self) -> String {
        self.display(Scenario::Exogenous)
    }

    pub fn decomposition_display(&self) -> String {
        self.display(Scenario::Decomposition)
    }
}

/// Comparison rows for a single metric, in baseline order
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonTable {
    metric: Metric,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn new(metric: Metric, rows: Vec<ComparisonRow>) -> Self {
        Self { metric, rows }
    }

    /// Build the table for `metric` from an already keyed index
    pub fn from_index(index: &ScenarioIndex<'_>, metric: Metric) -> Self {
        let value = |scenario: Scenario, model: &str| {
            index
                .lookup(scenario, model)
                .and_then(|record| record.value(metric))
        };

        let rows = index
            .models()
            .iter()
            .map(|model| {
                let model = model.as_str();
                ComparisonRow::new(
                    model,
                    metric,
                    value(Scenario::Baseline, model),
                    value(Scenario::Exogenous, model),
                    value(Scenario::Decomposition, model),
                )
            })
            .collect();

        Self { metric, rows }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean improvement of a scenario across all rows, skipping missing ones
    pub fn average_improvement(&self, scenario: Scenario) -> Option<f64> {
        mean_present(self.rows.iter().map(|row| row.improvement(scenario)))
    }
}

/// Build the comparison table of one metric.
///
/// Rows not keyed to a scenario, duplicates, and models without a baseline
/// result are skipped; use [`ComparisonSet::build`] to inspect or reject them.
pub fn build_comparison_table(
    records: &[MetricRecord],
    metric: Metric,
    labels: &ScenarioLabels,
) -> ComparisonTable {
    ComparisonTable::from_index(&ScenarioIndex::build(records, labels), metric)
}

/// Comparison tables for every metric, keyed by metric
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonSet {
    tables: Vec<ComparisonTable>,
    diagnostics: Vec<Diagnostic>,
}

impl ComparisonSet {
    /// Key the records once and build all six tables.
    ///
    /// Under [`MatchPolicy::Strict`] the first keying diagnostic is returned
    /// as an error; otherwise diagnostics are logged and kept.
    pub fn build(
        records: &[MetricRecord],
        labels: &ScenarioLabels,
        policy: MatchPolicy,
    ) -> Result<Self, CompareError> {
        let index = ScenarioIndex::build(records, labels);
        index.enforce(policy)?;

        let tables: Vec<ComparisonTable> = Metric::ALL
            .into_iter()
            .map(|metric| ComparisonTable::from_index(&index, metric))
            .collect();
        debug!(
            records = records.len(),
            models = index.models().len(),
            diagnostics = index.diagnostics().len(),
            "built comparison tables"
        );

        Ok(Self {
            tables,
            diagnostics: index.diagnostics().to_vec(),
        })
    }

    pub fn get(&self, metric: Metric) -> &ComparisonTable {
        &self.tables[metric.index()]
    }

    /// Tables in report order
    pub fn tables(&self) -> &[ComparisonTable] {
        &self.tables
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;
    use pretty_assertions::assert_eq;

    fn labels() -> ScenarioLabels {
        ScenarioLabels::new("Base", "Exog", "EEMD").unwrap()
    }

    #[test]
    fn exogenous_improvement_with_missing_decomposition() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 10.0),
            MetricRecord::new("ARIMA-Exog").with(Metric::Rmse, 8.0),
        ];
        let table = build_comparison_table(&records, Metric::Rmse, &labels());

        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.model, "ARIMA");
        assert_eq!(row.baseline_display(), "10.000");
        assert_eq!(row.exogenous_display(), "8.000 (+20.0%)");
        assert_eq!(row.decomposition_display(), "N/A");
    }

    #[test]
    fn zero_baseline_shows_value_without_percentage() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Mae, 0.0),
            MetricRecord::new("ARIMA-EEMD").with(Metric::Mae, 2.5),
        ];
        let table = build_comparison_table(&records, Metric::Mae, &labels());
        let row = &table.rows()[0];

        assert_eq!(row.eemd_improvement, None);
        assert_eq!(row.decomposition_display(), "2.500");
        assert_eq!(row.baseline_display(), "0.000");
    }

    #[test]
    fn r2_versus_rmse_direction() {
        let records = vec![
            MetricRecord::new("ARIMA-Base")
                .with(Metric::R2, 0.50)
                .with(Metric::Rmse, 0.50),
            MetricRecord::new("ARIMA-Exog")
                .with(Metric::R2, 0.60)
                .with(Metric::Rmse, 0.60),
        ];
        let r2 = build_comparison_table(&records, Metric::R2, &labels());
        let rmse = build_comparison_table(&records, Metric::Rmse, &labels());

        assert_eq!(r2.rows()[0].exogenous_display(), "0.600 (+20.0%)");
        assert_eq!(rmse.rows()[0].exogenous_display(), "0.600 (-20.0%)");
    }

    #[test]
    fn models_without_baseline_are_dropped() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 1.0),
            MetricRecord::new("LSTM-Exog").with(Metric::Rmse, 2.0),
            MetricRecord::new("LSTM-EEMD").with(Metric::Rmse, 3.0),
        ];
        let table = build_comparison_table(&records, Metric::Rmse, &labels());

        let models: Vec<_> = table.rows().iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, ["ARIMA"]);
    }

    #[test]
    fn missing_baseline_value_keeps_row() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 1.0),
            MetricRecord::new("ARIMA-Exog").with(Metric::Mape, 4.0),
        ];
        let table = build_comparison_table(&records, Metric::Mape, &labels());
        let row = &table.rows()[0];

        assert_eq!(row.baseline_display(), "N/A");
        assert_eq!(row.exogenous_display(), "4.000");
        assert_eq!(row.exog_improvement, None);
    }

    #[test]
    fn averages_skip_missing_and_all_missing_is_none() {
        let table = ComparisonTable::new(
            Metric::Rmse,
            vec![
                ComparisonRow::new("A", Metric::Rmse, Some(10.0), Some(9.0), None),
                ComparisonRow::new("B", Metric::Rmse, Some(10.0), Some(7.0), None),
                ComparisonRow::new("C", Metric::Rmse, Some(10.0), None, None),
            ],
        );

        let exog = table.average_improvement(Scenario::Exogenous).unwrap();
        assert!((exog - 20.0).abs() < 1e-9);
        assert_eq!(table.average_improvement(Scenario::Decomposition), None);
        assert_eq!(table.average_improvement(Scenario::Baseline), None);
    }

    #[test]
    fn set_caches_every_metric_in_order() {
        let records = vec![
            MetricRecord::new("ARIMA-Base")
                .with(Metric::Rmse, 10.0)
                .with(Metric::Bic, 200.0),
            MetricRecord::new("ARIMA-EEMD")
                .with(Metric::Rmse, 5.0)
                .with(Metric::Bic, 190.0),
        ];
        let set = ComparisonSet::build(&records, &labels(), MatchPolicy::Lenient).unwrap();

        let metrics: Vec<_> = set.tables().iter().map(|t| t.metric()).collect();
        assert_eq!(metrics, Metric::ALL);
        assert_eq!(set.get(Metric::Rmse).rows()[0].eemd_improvement, Some(50.0));
        let bic = set.get(Metric::Bic).rows()[0].eemd_improvement.unwrap();
        assert!((bic - 5.0).abs() < 1e-9);
        assert_eq!(set.get(Metric::Mae).rows()[0].baseline, None);
    }

    #[test]
    fn set_keeps_diagnostics_when_lenient() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 1.0),
            MetricRecord::new("LSTM-Exog").with(Metric::Rmse, 2.0),
        ];
        let set = ComparisonSet::build(&records, &labels(), MatchPolicy::Lenient).unwrap();

        assert_eq!(set.get(Metric::Rmse).len(), 1);
        assert_eq!(set.diagnostics().len(), 1);
        assert_eq!(set.diagnostics()[0].code, DiagnosticCode::UnmatchedModel);
    }

    #[test]
    fn set_rejects_when_strict() {
        let records = vec![
            MetricRecord::new("ARIMA-Base").with(Metric::Rmse, 1.0),
            MetricRecord::new("LSTM-Exog").with(Metric::Rmse, 2.0),
        ];
        let result = ComparisonSet::build(&records, &labels(), MatchPolicy::Strict);
        assert!(matches!(result, Err(CompareError::Rejected(_))));
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let set = ComparisonSet::build(&[], &labels(), MatchPolicy::Strict).unwrap();
        assert!(set.tables().iter().all(ComparisonTable::is_empty));
        assert_eq!(set.get(Metric::R2).average_improvement(Scenario::Exogenous), None);
    }
}
