use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create scratch directory '{0}'")]
    ScratchDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Scratch path exists but is not a directory: '{0}'")]
    ScratchDirNotADirectory(PathBuf),

    #[error("Failed to create temporary observation file in '{0}'")]
    TempFileCreation(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing observation snapshot '{0}'")]
    ParquetWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to scan observation snapshot '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Failed to build observation frame")]
    FrameBuild(#[source] PolarsError),
}

/// Why a single record was left out of the store. Not fatal: ingestion carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Discarded {
    #[error("Observation for location {location_id} at {timestamp} has no air temperature")]
    MissingAirTemp { location_id: i64, timestamp: String },

    #[error("Observation for location {location_id} has unparseable timestamp '{value}'")]
    InvalidTimestamp { location_id: i64, value: String },
}
