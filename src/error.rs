use crate::observations::error::{FetchError, NormalizeError};
use crate::stations::error::ProjectionError;
use crate::store::error::StoreError;
use crate::trend::error::TrendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationTrendError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Trend(#[from] TrendError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed processing a tabular dataset")]
    Frame(#[from] polars::error::PolarsError),
}
