use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("climate data service unavailable at {url}")]
    SourceUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("climate data service did not recognize the request for stations {ids:?} (HTTP {status})")]
    UnknownStation {
        ids: Vec<String>,
        status: reqwest::StatusCode,
    },

    #[error("I/O error buffering the service response")]
    ResponseIo(#[from] std::io::Error),

    #[error("parsing error processing observation CSV")]
    CsvRead(#[source] PolarsError),

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("observation references unknown station id '{0}'")]
    UnknownStationReference(String),

    #[error("failed processing the observation table")]
    Frame(#[from] PolarsError),

    #[error("observation table is missing a value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
}
