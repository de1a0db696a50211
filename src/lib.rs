//! Sales Analyzer - sales CSV cleaning, derived metrics & tabular reports.
//!
//! The binary is a thin wrapper; the pipeline lives here so it can be driven
//! from tests without spawning a process.

pub mod app;
pub mod cleaning;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod output;
pub mod reports;
