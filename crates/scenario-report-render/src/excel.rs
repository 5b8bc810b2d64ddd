//! Excel comparison report renderer
//!
//! Generates XLSX files with one sheet per metric and a cross-metric summary:
//! - Summary: average exogenous and EEMD improvement for every metric
//! - RMSE, MAE, MAPE, R2, AIC, BIC: per-model values with improvement over baseline
//!
//! ## Highlighting
//!
//! Exogenous and EEMD cells are filled green when the scenario beats the
//! baseline and red when it falls behind. Cells without a computable
//! improvement (missing value, zero baseline) or with exactly zero
//! improvement stay unfilled.
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Summary
//! | Model Performance Summary                                         |
//! |        |                          |                          |
//! | Metric | Avg Exog Improvement (%) | Avg EEMD Improvement (%) |
//! | RMSE   | +12.40                   | +3.25                    |
//! | MAE    | +10.02                   | -1.75                    |
//! ```
//!
//! The layout itself lives in [`crate::layout`]; this module only maps it onto
//! `rust_xlsxwriter` formats and writes the file.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use scenario_report_core::comparison::ComparisonSet;
use scenario_report_core::{
    MatchPolicy, MetricRecord, RenderError, Renderer, ScenarioLabels,
};
use tracing::{debug, info};

use crate::layout::{workbook_layout, CellStyle, SheetSpec};

const HEADER_FILL: u32 = 0x366092;
const HEADER_TEXT: u32 = 0xFFFFFF;
const IMPROVED_FILL: u32 = 0xC6EFCE;
const IMPROVED_TEXT: u32 = 0x006100;
const REGRESSED_FILL: u32 = 0xFFC7CE;
const REGRESSED_TEXT: u32 = 0x9C0006;

/// Excel comparison report renderer
#[derive(Clone, Debug, Default)]
pub struct ExcelRenderer {
    /// Scenario tags used in the `Model` column
    pub labels: ScenarioLabels,
    /// Treatment of malformed, duplicate and unmatched model rows
    pub policy: MatchPolicy,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set scenario labels
    pub fn labels(mut self, labels: ScenarioLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Fail on malformed, duplicate or unmatched model rows
    pub fn strict(mut self) -> Self {
        self.policy = MatchPolicy::Strict;
        self
    }

    /// Set the match policy
    pub fn policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Key the records and build every comparison table
    pub fn compare(&self, records: &[MetricRecord]) -> Result<ComparisonSet, RenderError> {
        Ok(ComparisonSet::build(records, &self.labels, self.policy)?)
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, comparisons: &ComparisonSet) -> Result<Vec<u8>, RenderError> {
        let mut workbook = self.build_workbook(comparisons)?;
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Write the workbook to `path`
    pub fn save(&self, comparisons: &ComparisonSet, path: &Path) -> Result<(), RenderError> {
        let mut workbook = self.build_workbook(comparisons)?;
        workbook.save(path).map_err(|e| match e {
            XlsxError::IoError(io) => RenderError::Io(io),
            other => RenderError::Format(format!("Failed to save Excel: {other}")),
        })?;
        info!(path = %path.display(), "Comparison tables saved to: {}", path.display());
        Ok(())
    }

    fn build_workbook(&self, comparisons: &ComparisonSet) -> Result<Workbook, RenderError> {
        let formats = ReportFormats::new();
        let mut workbook = Workbook::new();

        for spec in workbook_layout(comparisons) {
            Self::write_sheet(&mut workbook, &spec, &formats)?;
        }

        Ok(workbook)
    }

    fn write_sheet(
        workbook: &mut Workbook,
        spec: &SheetSpec,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&spec.name).map_err(format_error)?;

        for cell in &spec.cells {
            let format = formats.get(cell.style);
            if let Some(merge) = spec.merge_at(cell.row, cell.col) {
                sheet
                    .merge_range(merge.row, merge.first_col, merge.row, merge.last_col, &cell.text, format)
                    .map_err(format_error)?;
            } else {
                sheet
                    .write_string_with_format(cell.row, cell.col, cell.text.as_str(), format)
                    .map_err(format_error)?;
            }
        }

        for (col, width) in spec.column_widths.iter().enumerate() {
            sheet
                .set_column_width(col as u16, *width)
                .map_err(format_error)?;
        }

        debug!(sheet = %spec.name, cells = spec.cells.len(), "wrote worksheet");
        Ok(())
    }
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, comparisons: &ComparisonSet) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(comparisons)
    }
}

/// Build the comparison report for `records` and save it to `output_path`.
///
/// Uses the lenient match policy: rows that cannot be keyed or have no
/// baseline are logged and left out.
pub fn render_report(
    records: &[MetricRecord],
    output_path: impl AsRef<Path>,
    labels: &ScenarioLabels,
) -> Result<(), RenderError> {
    let renderer = ExcelRenderer::new().labels(labels.clone());
    let comparisons = renderer.compare(records)?;
    renderer.save(&comparisons, output_path.as_ref())
}

/// Reusable Excel formats, one per [`CellStyle`]
struct ReportFormats {
    title: Format,
    report_title: Format,
    header: Format,
    model_name: Format,
    value: Format,
    improved: Format,
    regressed: Format,
    label: Format,
}

impl ReportFormats {
    fn new() -> Self {
        let value = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        Self {
            title: Format::new().set_bold().set_font_size(14),
            report_title: Format::new().set_bold().set_font_size(16),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_background_color(HEADER_FILL)
                .set_font_color(HEADER_TEXT)
                .set_border(FormatBorder::Thin),
            model_name: Format::new().set_bold().set_border(FormatBorder::Thin),
            improved: value
                .clone()
                .set_background_color(IMPROVED_FILL)
                .set_font_color(IMPROVED_TEXT),
            regressed: value
                .clone()
                .set_background_color(REGRESSED_FILL)
                .set_font_color(REGRESSED_TEXT),
            value,
            label: Format::new().set_bold().set_border(FormatBorder::Thin),
        }
    }

    fn get(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Title => &self.title,
            CellStyle::ReportTitle => &self.report_title,
            CellStyle::Header => &self.header,
            CellStyle::ModelName => &self.model_name,
            CellStyle::Value => &self.value,
            CellStyle::Improved => &self.improved,
            CellStyle::Regressed => &self.regressed,
            CellStyle::Label => &self.label,
        }
    }
}
