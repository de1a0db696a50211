//! CSV Writer Module
//! Writes tables into the output directory through Polars' CSV writer.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::data::{AnalysisLog, Dataset, RawTable};
use crate::reports::{ColumnValues, Report, ReportKind, ReportTable};

pub const CLEANED_DATA_FILE: &str = "cleaned_sales_data.csv";
pub const ANALYSIS_LOG_FILE: &str = "analysis_log.csv";

/// Decimal places used for report floats.
const REPORT_FLOAT_PRECISION: usize = 2;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to prepare output '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    Polars(#[from] PolarsError),
}

/// Fixed output directory for one run.
pub struct CsvOutput {
    dir: PathBuf,
}

impl CsvOutput {
    /// Use `dir`, creating it if needed.
    pub fn create(dir: &Path) -> Result<Self, WriterError> {
        fs::create_dir_all(dir).map_err(|source| WriterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove data and report files left by an earlier run so the directory
    /// only reflects the current one.
    pub fn clear_previous(&self) -> Result<(), WriterError> {
        let names = ReportKind::ALL
            .iter()
            .map(|k| k.file_name())
            .chain([CLEANED_DATA_FILE.to_string()]);

        for name in names {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed stale output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(WriterError::Io { path, source }),
            }
        }
        Ok(())
    }

    /// Cleaned dataset with its derived columns, full precision.
    pub fn write_dataset(&self, dataset: &Dataset) -> Result<PathBuf, WriterError> {
        let mut df = Self::raw_table_to_frame(&dataset.to_table())?;
        self.write_frame(CLEANED_DATA_FILE, &mut df, None)
    }

    pub fn write_report(&self, report: &Report) -> Result<PathBuf, WriterError> {
        let mut df = Self::report_to_frame(&report.table)?;
        self.write_frame(
            &report.kind.file_name(),
            &mut df,
            Some(REPORT_FLOAT_PRECISION),
        )
    }

    /// `step,message` rows in recording order.
    pub fn write_log(&self, log: &AnalysisLog) -> Result<PathBuf, WriterError> {
        let steps: Vec<String> = log.entries().iter().map(|e| e.step.clone()).collect();
        let messages: Vec<String> = log.entries().iter().map(|e| e.message.clone()).collect();

        let mut df = DataFrame::new(vec![
            Column::new("step".into(), steps),
            Column::new("message".into(), messages),
        ])?;
        self.write_frame(ANALYSIS_LOG_FILE, &mut df, None)
    }

    fn write_frame(
        &self,
        file_name: &str,
        df: &mut DataFrame,
        float_precision: Option<usize>,
    ) -> Result<PathBuf, WriterError> {
        let path = self.dir.join(file_name);
        let mut file = File::create(&path).map_err(|source| WriterError::Io {
            path: path.clone(),
            source,
        })?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_float_precision(float_precision)
            .finish(df)?;

        debug!(path = %path.display(), rows = df.height(), "csv written");
        Ok(path)
    }

    /// Text columns, empty cells as nulls.
    pub fn raw_table_to_frame(table: &RawTable) -> Result<DataFrame, WriterError> {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Option<String>> =
                    table.column(idx).map(|v| v.map(str::to_string)).collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    pub fn report_to_frame(table: &ReportTable) -> Result<DataFrame, WriterError> {
        let columns = table
            .columns
            .iter()
            .map(|col| {
                let name: PlSmallStr = col.name.as_str().into();
                match &col.values {
                    ColumnValues::Text(v) => Column::new(name, v.clone()),
                    ColumnValues::Int(v) => Column::new(name, v.clone()),
                    ColumnValues::Float(v) => Column::new(name, v.clone()),
                }
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}
