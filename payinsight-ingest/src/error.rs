//! Errors surfaced before or around extraction. Field misses are not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("document is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("table is missing required column: {0}")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, IngestError>;
