use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error(
        "insufficient data for a quadratic trend: {rows} row(s) with {distinct_days} distinct day(s) of year"
    )]
    InsufficientData { rows: usize, distinct_days: usize },

    #[error("confidence level {0} is outside the open interval (0, 1)")]
    InvalidConfidenceLevel(f64),

    #[error("failed to evaluate the Student-t distribution with {dof} degrees of freedom")]
    Distribution { dof: usize },
}
