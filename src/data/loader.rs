//! CSV Data Loader Module
//! Handles CSV file loading with Polars and conversion into a raw text table.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::table::RawTable;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file as a text-only table.
    ///
    /// Every column is read as a string so that type coercion stays a cleaning
    /// decision instead of a parser one. A zero-byte file yields an empty table.
    pub fn load_table(path: &Path) -> Result<RawTable, LoaderError> {
        let metadata = fs::metadata(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoaderError::NotFound(path.to_path_buf())
            } else {
                LoaderError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        if metadata.len() == 0 {
            debug!(path = %path.display(), "input file is empty");
            return Ok(RawTable::default());
        }

        let df = Self::load_csv(path)?;
        Self::to_raw_table(&df)
    }

    /// Load a CSV file using Polars with all columns typed as strings.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_truncate_ragged_lines(true)
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(rows = df.height(), columns = df.width(), "csv loaded");
        Ok(df)
    }

    /// Convert a DataFrame into a `RawTable`, row by row.
    pub fn to_raw_table(df: &DataFrame) -> Result<RawTable, LoaderError> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut columns: Vec<Vec<Option<String>>> = Vec::with_capacity(headers.len());
        for column in df.get_columns() {
            let as_text = column.cast(&DataType::String)?;
            let ca = as_text.str()?;
            columns.push(ca.into_iter().map(|v| v.map(str::to_string)).collect());
        }

        let mut table = RawTable::new(headers);
        for row_idx in 0..df.height() {
            let cells = columns
                .iter_mut()
                .map(|col| col.get_mut(row_idx).and_then(Option::take))
                .collect();
            table.push_row(cells);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_every_column_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "sales.csv",
            "Date,Sales,Quantity\n2024-01-05,10.50,2\n2024-01-06,,3\n",
        );

        let table = DataLoader::load_table(&path).unwrap();
        assert_eq!(table.headers, ["Date", "Sales", "Quantity"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows[0][1].as_deref(), Some("10.50"));
        assert_eq!(table.rows[1][1], None);
        assert_eq!(table.rows[1][2].as_deref(), Some("3"));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", "Revenue,Cost,Quantity\n");

        let table = DataLoader::load_table(&path).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn zero_byte_file_is_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "blank.csv", "");

        let table = DataLoader::load_table(&path).unwrap();
        assert_eq!(table, RawTable::default());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }
}
