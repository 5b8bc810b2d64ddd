//! Loading of evaluation result tables

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use scenario_report_core::MetricRecord;

/// Supported result table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Header row with `Model` and metric columns; empty cells are missing
    Csv,
    /// Array of objects keyed by column name; `null` is missing
    Json,
}

/// Detect input format from extension
pub fn detect_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
        _ => InputFormat::Csv,
    }
}

/// Load result rows from a file (format chosen by extension)
pub fn load_records(path: &Path) -> Result<Vec<MetricRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open results {}", path.display()))?;

    let records = match detect_format(path) {
        InputFormat::Csv => read_csv(file),
        InputFormat::Json => read_json(file),
    }
    .with_context(|| format!("Failed to parse results {}", path.display()))?;

    tracing::debug!(rows = records.len(), path = %path.display(), "loaded results");
    Ok(records)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MetricRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, row) in reader.deserialize().enumerate() {
        // Header is line 1
        let record: MetricRecord = row.with_context(|| format!("Invalid row at line {}", line + 2))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<MetricRecord>> {
    Ok(serde_json::from_reader(reader)?)
}
