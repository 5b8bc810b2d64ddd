//! scenario-report CLI - Forecast scenario comparison reports
//!
//! Reads a table of per-model evaluation metrics and writes a styled XLSX
//! workbook comparing the baseline, exogenous and EEMD scenarios.

mod config;
mod input;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scenario_report_render::ExcelRenderer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Overrides, ReportConfig};

#[derive(Parser)]
#[command(name = "scenario-report")]
#[command(author, version, about = "Forecast scenario comparison reports", long_about = None)]
struct Cli {
    /// Results table (.csv, or .json for an array of rows)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output workbook path
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Label of the baseline scenario in the Model column
    #[arg(long, env = "SCENARIO_REPORT_BASELINE_LABEL")]
    baseline_label: Option<String>,

    /// Label of the exogenous scenario in the Model column
    #[arg(long, env = "SCENARIO_REPORT_EXOG_LABEL")]
    exog_label: Option<String>,

    /// Label of the EEMD scenario in the Model column
    #[arg(long, env = "SCENARIO_REPORT_EEMD_LABEL")]
    eemd_label: Option<String>,

    /// Fail on malformed, duplicate or unmatched model rows
    #[arg(long)]
    strict: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            baseline: self.baseline_label.clone(),
            exogenous: self.exog_label.clone(),
            decomposition: self.eemd_label.clone(),
            strict: self.strict,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    let config = config
        .with_overrides(&cli.overrides())
        .context("Invalid scenario labels")?;

    let records = input::load_records(&cli.input)?;

    let renderer = ExcelRenderer::new()
        .labels(config.labels)
        .policy(config.policy);
    let comparisons = renderer.compare(&records)?;
    renderer
        .save(&comparisons, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    let skipped = comparisons.diagnostics().len();
    if skipped > 0 {
        eprintln!("{skipped} result row(s) were left out of the report, see warnings above");
    }
    println!("Comparison tables saved to: {}", cli.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}
