//! Keying of result rows into `(model, scenario)` pairs.
//!
//! A `Model` string is keyed by exact suffix match against the whitelisted
//! scenario labels, with `-` as the delimiter: `ARIMA-Exog` is the model
//! `ARIMA` under the exogenous scenario. Because [`ScenarioLabels`] rejects
//! labels that contain one another, at most one label can match.

use std::collections::HashMap;

use tracing::warn;

use crate::{
    CompareError, Diagnostic, DiagnosticCode, MatchPolicy, MetricRecord, Scenario, ScenarioLabels,
};

/// Delimiter between the model name and the scenario label
pub const DELIMITER: char = '-';

/// Structured identity of a result row
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelKey {
    /// Model name with the scenario suffix removed
    pub name: String,
    pub scenario: Scenario,
}

/// Parse a `Model` string into its key, `None` if it is malformed
pub fn parse_model_key(model: &str, labels: &ScenarioLabels) -> Option<ModelKey> {
    Scenario::ALL.into_iter().find_map(|scenario| {
        let name = model
            .strip_suffix(labels.label(scenario))?
            .strip_suffix(DELIMITER)?;
        (!name.is_empty()).then(|| ModelKey {
            name: name.to_string(),
            scenario,
        })
    })
}

/// Records grouped by scenario and bare model name.
///
/// The baseline partition defines the model universe: [`ScenarioIndex::models`]
/// lists its names in first-appearance order. Only the first record for a
/// given key is kept.
#[derive(Debug)]
pub struct ScenarioIndex<'a> {
    models: Vec<String>,
    partitions: [HashMap<String, &'a MetricRecord>; 3],
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ScenarioIndex<'a> {
    pub fn build(records: &'a [MetricRecord], labels: &ScenarioLabels) -> Self {
        let mut index = Self {
            models: Vec::new(),
            partitions: Default::default(),
            diagnostics: Vec::new(),
        };
        // Non-baseline keys in input order, checked against the baseline below.
        let mut secondary: Vec<(&'a str, String)> = Vec::new();

        for record in records {
            let Some(key) = parse_model_key(&record.model, labels) else {
                index.diagnostics.push(Diagnostic::new(
                    DiagnosticCode::MalformedModel,
                    &record.model,
                    format!(
                        "expected '<model>{DELIMITER}<label>' with one of '{}', '{}', '{}'",
                        labels.baseline(),
                        labels.exogenous(),
                        labels.decomposition()
                    ),
                ));
                continue;
            };

            let partition = &mut index.partitions[key.scenario.index()];
            if partition.contains_key(&key.name) {
                index.diagnostics.push(Diagnostic::new(
                    DiagnosticCode::DuplicateModel,
                    &record.model,
                    format!("duplicate {} result for '{}', first one kept", key.scenario, key.name),
                ));
                continue;
            }
            partition.insert(key.name.clone(), record);

            if key.scenario == Scenario::Baseline {
                index.models.push(key.name);
            } else {
                secondary.push((record.model.as_str(), key.name));
            }
        }

        let baseline = &index.partitions[Scenario::Baseline.index()];
        let unmatched: Vec<Diagnostic> = secondary
            .into_iter()
            .filter(|(_, name)| !baseline.contains_key(name))
            .map(|(model, name)| {
                Diagnostic::new(
                    DiagnosticCode::UnmatchedModel,
                    model,
                    format!("no baseline result for '{name}', dropped from the report"),
                )
            })
            .collect();
        index.diagnostics.extend(unmatched);

        index
    }

    /// Bare model names of the baseline partition, in input order
    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn lookup(&self, scenario: Scenario, model: &str) -> Option<&'a MetricRecord> {
        self.partitions[scenario.index()].get(model).copied()
    }

    /// Findings collected while keying, in detection order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Apply a match policy to the collected diagnostics.
    ///
    /// Lenient logs every diagnostic as a warning; strict fails on the first.
    pub fn enforce(&self, policy: MatchPolicy) -> Result<(), CompareError> {
        match policy {
            MatchPolicy::Strict => match self.diagnostics.first() {
                Some(diagnostic) => Err(CompareError::Rejected(diagnostic.clone())),
                None => Ok(()),
            },
            MatchPolicy::Lenient => {
                for diagnostic in &self.diagnostics {
                    warn!(code = diagnostic.code.as_str(), model = %diagnostic.model, "{}", diagnostic.message);
                }
                Ok(())
            }
        }
    }
}
