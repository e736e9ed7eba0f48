use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no artifact named '{0}' in the data directory")]
    NotFound(String),

    #[error("failed to create data directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing parquet artifact '{0}'")]
    WriteIo(PathBuf, #[source] std::io::Error),

    #[error("encoding error writing parquet artifact '{0}'")]
    WritePolars(PathBuf, #[source] PolarsError),

    #[error("failed to read parquet artifact '{0}'")]
    ReadPolars(PathBuf, #[source] PolarsError),

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
