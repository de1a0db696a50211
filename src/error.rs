//! Application errors and their process exit codes.

use thiserror::Error;

use crate::cleaning::CleanError;
use crate::config::ConfigError;
use crate::data::LoaderError;
use crate::output::WriterError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Write(#[from] WriterError),
    /// The data could not support any report. The analysis log was written.
    #[error("{0} (see analysis log)")]
    Fatal(#[from] CleanError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Load(_) | AppError::Write(_) => 2,
            AppError::Fatal(_) => 3,
        }
    }
}
