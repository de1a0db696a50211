//! Data module - CSV loading, the transaction model and the analysis log

pub mod analysis_log;
mod dataset;
mod loader;
mod table;

pub use analysis_log::{AnalysisLog, LogEntry};
pub use dataset::{Dataset, DerivedMetrics, Transaction, DERIVED_COLUMNS};
pub use loader::{DataLoader, LoaderError};
pub use table::RawTable;
