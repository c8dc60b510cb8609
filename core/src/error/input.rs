use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a year set from disk.
#[derive(Error, Debug)]
pub enum YearSetError {
    #[error("cannot open year file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed year file: {0}")]
    Csv(#[from] csv::Error),

    #[error("year file has no rows: {0}")]
    Empty(String),

    #[error("invalid year in column {column}: {value:?}")]
    InvalidYear { column: usize, value: String },
}
