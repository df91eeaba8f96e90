//! Where the observation snapshot handed to the engine lives.

use crate::store::error::StoreError;
use crate::utils::ensure_scratch_dir_exists;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SNAPSHOT_PREFIX: &str = "observations-";
const SNAPSHOT_SUFFIX: &str = ".parquet";

/// Storage used for the observation snapshot. Chosen when the store is built;
/// the choice never changes analysis results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// Keep the snapshot frame in memory.
    #[default]
    InMemory,
    /// Write the snapshot to a temporary Parquet file inside `dir` and scan it lazily.
    /// Useful for inspecting the exact rows the engine saw.
    TempFile { dir: PathBuf },
}

/// Immutable view of the store's observations, ready for the engine.
///
/// When backed by a temporary file, the file is deleted once the snapshot is dropped,
/// so the snapshot must outlive every `collect` on frames derived from it.
pub struct ObservationSnapshot {
    /// Observation rows, one per stored sample, in primary-key order.
    pub frame: LazyFrame,
    backing_file: Option<NamedTempFile>,
}

impl ObservationSnapshot {
    pub fn backing_path(&self) -> Option<&Path> {
        self.backing_file.as_ref().map(|f| f.path())
    }
}

impl StoreBackend {
    pub(crate) fn snapshot(&self, mut df: DataFrame) -> Result<ObservationSnapshot, StoreError> {
        match self {
            StoreBackend::InMemory => Ok(ObservationSnapshot {
                frame: df.lazy(),
                backing_file: None,
            }),
            StoreBackend::TempFile { dir } => {
                ensure_scratch_dir_exists(dir)?;
                let mut file = tempfile::Builder::new()
                    .prefix(SNAPSHOT_PREFIX)
                    .suffix(SNAPSHOT_SUFFIX)
                    .tempfile_in(dir)
                    .map_err(|e| StoreError::TempFileCreation(dir.clone(), e))?;
                let path = file.path().to_path_buf();

                ParquetWriter::new(file.as_file_mut())
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut df)
                    .map_err(|e| StoreError::ParquetWrite(path.clone(), e))?;
                info!(
                    "Wrote {} observations to snapshot file {}",
                    df.height(),
                    path.display()
                );

                let frame = LazyFrame::scan_parquet(&path, Default::default())
                    .map_err(|e| StoreError::ParquetScan(path.clone(), e))?;
                Ok(ObservationSnapshot {
                    frame,
                    backing_file: Some(file),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> PolarsResult<DataFrame> {
        df!(
            "location_id" => [1i64, 1, 2],
            "air_temp" => [10.0f64, 12.5, -3.0],
        )
    }

    #[test]
    fn test_in_memory_snapshot_has_no_file() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = StoreBackend::InMemory.snapshot(sample_frame()?)?;
        assert!(snapshot.backing_path().is_none());
        assert_eq!(snapshot.frame.collect()?.height(), 3);
        Ok(())
    }

    #[test]
    fn test_temp_file_snapshot_round_trips_and_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let backend = StoreBackend::TempFile {
            dir: dir.path().join("scratch"),
        };
        let snapshot = backend.snapshot(sample_frame()?)?;
        let path = snapshot
            .backing_path()
            .expect("temp file backend should create a file")
            .to_path_buf();
        assert!(path.exists());
        assert!(path.starts_with(dir.path().join("scratch")));

        let df = snapshot.frame.clone().collect()?;
        assert_eq!(df.height(), 3);
        let temps: Vec<Option<f64>> = df.column("air_temp")?.f64()?.into_iter().collect();
        assert_eq!(temps, vec![Some(10.0), Some(12.5), Some(-3.0)]);

        drop(snapshot);
        assert!(!path.exists(), "snapshot file should be removed on drop");
        Ok(())
    }
}
