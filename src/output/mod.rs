//! Output module - CSV persistence of the dataset, reports and analysis log

mod writer;

pub use writer::{CsvOutput, WriterError};
