//! Analysis Log Module
//! Append-only record of every cleaning/derivation decision made during a run.

use tracing::info;

/// Step names used in the log.
pub mod step {
    pub const LOAD: &str = "load";
    pub const COLUMN_RESOLUTION: &str = "column_resolution";
    pub const MISSING_VALUES: &str = "missing_values";
    pub const DUPLICATES: &str = "duplicates";
    pub const INVALID_VALUES: &str = "invalid_values";
    pub const DATE_PARSING: &str = "date_parsing";
    pub const DERIVED_COLUMNS: &str = "derived_columns";
    pub const REPORTS: &str = "reports";
    pub const FATAL: &str = "fatal";
}

/// One `(step, message)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub step: String,
    pub message: String,
}

/// Ordered log of a single run. Entries can only be appended.
#[derive(Debug, Clone, Default)]
pub struct AnalysisLog {
    entries: Vec<LogEntry>,
}

impl AnalysisLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and mirror it to the diagnostic log.
    pub fn record(&mut self, step: &str, message: impl Into<String>) {
        let message = message.into();
        info!(step = %step, "{message}");
        self.entries.push(LogEntry {
            step: step.to_string(),
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries recorded under `step`, in order.
    pub fn for_step<'a>(&'a self, step: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| e.step == step)
    }

    /// True if any entry under `step` contains `needle`.
    pub fn contains(&self, step: &str, needle: &str) -> bool {
        self.for_step(step).any(|e| e.message.contains(needle))
    }
}

/// `1 row` / `3 rows`.
pub fn rows(count: usize) -> String {
    plural(count, "row", "rows")
}

pub fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
