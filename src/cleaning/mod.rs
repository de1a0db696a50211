//! Cleaning module - column resolution, row filtering and derived metrics

mod columns;
mod derive;
mod pipeline;

pub use columns::{normalize_header_name, resolve_columns, AliasConflict, ColumnResolution};
pub use derive::{derive_metrics, quarter_of, DivisionSkips};
pub use pipeline::{CleanError, Cleaner};
