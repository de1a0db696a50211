//! Top-level application orchestration.
//!
//! `execute` is the whole run for an explicit configuration:
//! load -> clean/derive -> reports -> write CSVs. `run` adds argument
//! parsing, logging setup and the console summary around it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::cleaning::Cleaner;
use crate::cli::Cli;
use crate::config::AnalyzerConfig;
use crate::data::analysis_log::{plural, rows, step};
use crate::data::{AnalysisLog, DataLoader, Dataset};
use crate::error::AppError;
use crate::output::CsvOutput;
use crate::reports::{format_summary_table, generate_reports, ReportSet};

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub reports: ReportSet,
    pub log: AnalysisLog,
    pub written: Vec<PathBuf>,
}

/// Entry point for the `sales-analyzer` binary.
pub fn run() -> anyhow::Result<()> {
    crate::logging::init_logging();

    let config = Cli::parse()
        .into_config()
        .map_err(AppError::from)
        .context("Invalid configuration")?;
    let output = execute(&config)
        .with_context(|| format!("Analysis of '{}' failed", config.input_path.display()))?;

    println!(
        "Analysis complete: {} written to '{}'",
        plural(output.written.len(), "file", "files"),
        config.output_dir.display()
    );
    if let Some(summary) = &output.reports.summary {
        print!("{}", format_summary_table(summary));
    }

    Ok(())
}

/// Run the full analysis for `config`.
///
/// On a fatal data condition the analysis log is still written and
/// `AppError::Fatal` is returned; no other files are produced.
pub fn execute(config: &AnalyzerConfig) -> Result<RunOutput, AppError> {
    let table = DataLoader::load_table(&config.input_path)?;

    let mut log = AnalysisLog::new();
    log.record(
        step::LOAD,
        format!(
            "loaded {} with {} from '{}'",
            rows(table.height()),
            plural(table.width(), "column", "columns"),
            config.input_path.display()
        ),
    );

    let output = CsvOutput::create(&config.output_dir)?;
    output.clear_previous()?;

    let dataset = match Cleaner::new(config).clean(table, &mut log) {
        Ok(dataset) => dataset,
        Err(err) => {
            output.write_log(&log)?;
            return Err(err.into());
        }
    };
    info!(rows = dataset.len(), "dataset cleaned");

    let reports = generate_reports(&dataset, config, &mut log);

    let mut written = vec![output.write_dataset(&dataset)?];
    for report in &reports.reports {
        written.push(output.write_report(report)?);
    }
    log.record(
        step::REPORTS,
        format!(
            "wrote cleaned dataset and {} to '{}'",
            plural(reports.reports.len(), "report", "reports"),
            output.dir().display()
        ),
    );
    written.push(output.write_log(&log)?);

    Ok(RunOutput {
        dataset,
        reports,
        log,
        written,
    })
}
