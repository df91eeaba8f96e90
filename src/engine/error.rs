use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Unexpected null in column '{column}' at row {row}")]
    UnexpectedNull { column: String, row: usize },

    #[error("Day number {0} does not map to a calendar date")]
    InvalidDayNumber(i32),

    #[error("Period rank {0} does not name a diurnal period")]
    InvalidPeriodRank(i32),
}
