//! # scenario-report-render
//!
//! Rendering backends for scenario comparison reports.
//!
//! This crate provides:
//! - A pure workbook layout (`layout`): sheet specifications built from the
//!   comparison tables, inspectable without writing a file
//! - Excel output (`excel`): styled XLSX with a summary sheet and one sheet
//!   per metric
//!
//! ## Example
//!
//! ```rust,ignore
//! use scenario_report_core::{Renderer, ScenarioLabels};
//! use scenario_report_render::{render_report, ExcelRenderer};
//!
//! // One call: compare, lay out, save
//! render_report(&records, "comparison.xlsx", &ScenarioLabels::default())?;
//!
//! // Or step by step, failing on rows without a baseline
//! let renderer = ExcelRenderer::new().strict();
//! let comparisons = renderer.compare(&records)?;
//! let xlsx_bytes = renderer.render(&comparisons)?;
//! ```

pub mod excel;
pub mod layout;

pub use excel::{render_report, ExcelRenderer};
pub use layout::{workbook_layout, CellStyle, SheetSpec};
