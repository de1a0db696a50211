//! Command-line parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AnalyzerConfig, ConfigError};

/// Clean a sales transaction CSV and write summary reports.
#[derive(Debug, Parser)]
#[command(name = "sales-analyzer", version, about)]
pub struct Cli {
    /// Sales CSV to analyse [default: data/sales_data.csv].
    #[arg(value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Directory for the cleaned data, reports and analysis log [default: output].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON config file; command-line flags override its values.
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// chrono format every date cell must match (e.g. "%d/%m/%Y").
    #[arg(long)]
    pub date_format: Option<String>,

    /// Rows kept in the ranked reports.
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Minimum purchases for a customer to count as loyal.
    #[arg(long)]
    pub min_purchases: Option<usize>,
}

impl Cli {
    /// Resolve defaults, config file and flags into one configuration.
    pub fn into_config(self) -> Result<AnalyzerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(v) = self.input {
            config.input_path = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.date_format {
            config.date_format = v;
        }
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        if let Some(v) = self.min_purchases {
            config.loyal_min_transactions = v;
        }

        config.validate()?;
        Ok(config)
    }
}
