use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read observation file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse observation file '{0}' as BoM JSON")]
    JsonParse(PathBuf, #[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
