//! Error types for acquisition and the pipeline.

use tabload_db::{ConfigError, WriteError};
use tabload_table::TableError;

/// Failure to acquire or parse the source dataset.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("source payload has no header row")]
    Empty,
    #[error("invalid CSV")]
    Parse(#[from] csv::Error),
    #[error("line {line} has {found} fields, header has {expected}")]
    ExtraFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("invalid table")]
    Table(#[from] TableError),
}

/// Failure of a load run, by stage.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch source data")]
    Fetch(#[from] FetchError),
    #[error("invalid database configuration")]
    Config(#[from] ConfigError),
    #[error("failed to write table")]
    Write(#[from] WriteError),
}
