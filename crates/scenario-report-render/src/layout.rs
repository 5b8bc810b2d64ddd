//! Workbook layout as plain data.
//!
//! Every sheet is described as a [`SheetSpec`] before anything touches the
//! XLSX writer, so placement and highlighting can be checked without opening
//! a workbook. Rows and columns are zero-based: row 2 here is row 3 in Excel.
//!
//! ```text
//! Sheet: RMSE
//! | RMSE Comparison: Baseline vs Exogenous vs EEMD (merged A1:E1)  |
//! |                      |          |                |            |
//! | Model                | Baseline | Exogenous (Δ%) | EEMD (Δ%)  |
//! | ARIMA                | 10.000   | 8.000 (+20.0%) | N/A        |
//! |                      |          |                |            |
//! | Average Improvement: | Baseline | +20.00%        | N/A        |
//! ```

use scenario_report_core::comparison::{ComparisonSet, ComparisonTable};
use scenario_report_core::improvement::{format_signed, NOT_AVAILABLE};
use scenario_report_core::Scenario;

pub const SUMMARY_SHEET: &str = "Summary";
pub const SUMMARY_TITLE: &str = "Model Performance Summary";

pub const METRIC_HEADERS: [&str; 4] = ["Model", "Baseline", "Exogenous (Δ%)", "EEMD (Δ%)"];
pub const SUMMARY_HEADERS: [&str; 3] = [
    "Metric",
    "Avg Exog Improvement (%)",
    "Avg EEMD Improvement (%)",
];

pub const AVERAGE_LABEL: &str = "Average Improvement:";

pub const TITLE_ROW: u32 = 0;
pub const HEADER_ROW: u32 = 2;
pub const FIRST_DATA_ROW: u32 = 3;

/// Last column of the merged title on metric sheets (A1:E1)
pub const TITLE_LAST_COL: u16 = 4;

pub const METRIC_COLUMN_WIDTHS: [f64; 4] = [20.0, 15.0, 25.0, 25.0];
pub const SUMMARY_COLUMN_WIDTHS: [f64; 3] = [15.0, 25.0, 25.0];

/// Visual role of a cell, mapped to a concrete format at write time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStyle {
    /// Metric sheet title, bold 14pt
    Title,
    /// Summary sheet title, bold 16pt
    ReportTitle,
    Header,
    ModelName,
    /// Centered bordered value
    Value,
    /// Comparison beat baseline
    Improved,
    /// Comparison fell behind baseline
    Regressed,
    /// Bold bordered row label
    Label,
}

/// Style for a comparison cell: highlighted only for a strictly signed improvement
pub fn improvement_style(improvement: Option<f64>) -> CellStyle {
    match improvement {
        Some(v) if v > 0.0 => CellStyle::Improved,
        Some(v) if v < 0.0 => CellStyle::Regressed,
        _ => CellStyle::Value,
    }
}

/// Average improvement as shown on metric sheets, `+3.25%`
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(_) => format!("{}%", format_signed(value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub text: String,
    pub style: CellStyle,
}

/// Horizontal merge anchored at an existing cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merge {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
}

/// Everything needed to write one worksheet
#[derive(Clone, Debug, PartialEq)]
pub struct SheetSpec {
    pub name: String,
    pub cells: Vec<Cell>,
    pub merges: Vec<Merge>,
    pub column_widths: Vec<f64>,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
            merges: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    fn put(&mut self, row: u32, col: u16, text: impl Into<String>, style: CellStyle) {
        self.cells.push(Cell {
            row,
            col,
            text: text.into(),
            style,
        });
    }

    fn put_row<S: AsRef<str>>(&mut self, row: u32, texts: &[S], style: CellStyle) {
        for (col, text) in texts.iter().enumerate() {
            self.put(row, col as u16, text.as_ref(), style);
        }
    }

    /// Cell at a zero-based position
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Merge whose anchor is at this position
    pub fn merge_at(&self, row: u32, col: u16) -> Option<&Merge> {
        self.merges.iter().find(|m| m.row == row && m.first_col == col)
    }

    /// Last populated row
    pub fn last_row(&self) -> Option<u32> {
        self.cells.iter().map(|c| c.row).max()
    }
}

/// Row of the "Average Improvement" line for a table of `rows` models
pub fn average_row(rows: usize) -> u32 {
    FIRST_DATA_ROW + rows as u32 + 1
}

/// Sheet for one metric: title, header, one row per model, averages
pub fn metric_sheet(table: &ComparisonTable) -> SheetSpec {
    let metric = table.metric();
    let mut sheet = SheetSpec::new(metric.name());

    sheet.put(
        TITLE_ROW,
        0,
        format!("{metric} Comparison: Baseline vs Exogenous vs EEMD"),
        CellStyle::Title,
    );
    sheet.merges.push(Merge {
        row: TITLE_ROW,
        first_col: 0,
        last_col: TITLE_LAST_COL,
    });

    sheet.put_row(HEADER_ROW, &METRIC_HEADERS, CellStyle::Header);

    for (row, data) in (FIRST_DATA_ROW..).zip(table.rows()) {
        sheet.put(row, 0, data.model.as_str(), CellStyle::ModelName);
        sheet.put(row, 1, data.baseline_display(), CellStyle::Value);
        sheet.put(
            row,
            2,
            data.exogenous_display(),
            improvement_style(data.exog_improvement),
        );
        sheet.put(
            row,
            3,
            data.decomposition_display(),
            improvement_style(data.eemd_improvement),
        );
    }

    let row = average_row(table.len());
    sheet.put(row, 0, AVERAGE_LABEL, CellStyle::Label);
    sheet.put(row, 1, "Baseline", CellStyle::Value);
    sheet.put(
        row,
        2,
        format_average(table.average_improvement(Scenario::Exogenous)),
        CellStyle::Value,
    );
    sheet.put(
        row,
        3,
        format_average(table.average_improvement(Scenario::Decomposition)),
        CellStyle::Value,
    );

    sheet.column_widths = METRIC_COLUMN_WIDTHS.to_vec();
    sheet
}

/// Cross-metric sheet with one row of average improvements per metric
pub fn summary_sheet(comparisons: &ComparisonSet) -> SheetSpec {
    let mut sheet = SheetSpec::new(SUMMARY_SHEET);
    sheet.put(TITLE_ROW, 0, SUMMARY_TITLE, CellStyle::ReportTitle);
    sheet.put_row(HEADER_ROW, &SUMMARY_HEADERS, CellStyle::Header);

    for (row, table) in (FIRST_DATA_ROW..).zip(comparisons.tables()) {
        sheet.put_row(
            row,
            &[
                table.metric().name().to_string(),
                format_signed(table.average_improvement(Scenario::Exogenous)),
                format_signed(table.average_improvement(Scenario::Decomposition)),
            ],
            CellStyle::Value,
        );
    }

    sheet.column_widths = SUMMARY_COLUMN_WIDTHS.to_vec();
    sheet
}

/// All sheets in workbook order: the summary first, then one per metric
pub fn workbook_layout(comparisons: &ComparisonSet) -> Vec<SheetSpec> {
    std::iter::once(summary_sheet(comparisons))
        .chain(comparisons.tables().iter().map(metric_sheet))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn improvement_style_is_strict() {
        assert_eq!(improvement_style(Some(0.1)), CellStyle::Improved);
        assert_eq!(improvement_style(Some(-0.1)), CellStyle::Regressed);
        assert_eq!(improvement_style(Some(0.0)), CellStyle::Value);
        assert_eq!(improvement_style(None), CellStyle::Value);
    }

    #[test]
    fn average_formatting() {
        assert_eq!(format_average(Some(3.254)), "+3.25%");
        assert_eq!(format_average(Some(-12.0)), "-12.00%");
        assert_eq!(format_average(None), "N/A");
    }

    #[test]
    fn average_row_leaves_one_blank_row() {
        // 1-based: data ends at row len + 3, average sits at row len + 5.
        assert_eq!(average_row(0) + 1, 5);
        assert_eq!(average_row(3) + 1, 8);
    }

    #[test]
    fn put_row_fills_columns_from_zero() {
        let mut sheet = SheetSpec::new("S");
        sheet.put_row(2, &["a", "b"], CellStyle::Header);
        assert_eq!(sheet.cell(2, 1).map(|c| c.text.as_str()), Some("b"));
        assert_eq!(sheet.last_row(), Some(2));
        assert_eq!(sheet.cell(2, 2), None);
    }
}
