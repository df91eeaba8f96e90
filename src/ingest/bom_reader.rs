use crate::ingest::error::IngestError;
use crate::store::observation_store::ObservationStore;
use crate::types::observation::{BomDocument, RawObservation};
use log::{info, warn};
use serde::Serialize;
use std::ops::AddAssign;
use std::path::Path;
use tokio::{fs, task};

/// Record counts from one or more ingested files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub files: usize,
    /// Records found in the files, whether kept or not.
    pub records: usize,
    /// Records that added a new observation to the store.
    pub stored: usize,
    /// Records whose (location, date, time) was already stored.
    pub duplicates: usize,
    /// Records rejected for a missing temperature or a bad timestamp.
    pub discarded: usize,
}

impl AddAssign for IngestSummary {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.records += other.records;
        self.stored += other.stored;
        self.duplicates += other.duplicates;
        self.discarded += other.discarded;
    }
}

/// Reads BoM observation JSON files into an [`ObservationStore`].
pub struct BomReader;

impl BomReader {
    /// Reads a BoM observation file and returns its records.
    ///
    /// The file is read asynchronously and parsed on a blocking task.
    pub async fn read_file(path: &Path) -> Result<Vec<RawObservation>, IngestError> {
        let path_buf = path.to_path_buf();
        let bytes = fs::read(&path_buf)
            .await
            .map_err(|e| IngestError::FileRead(path_buf.clone(), e))?;

        let document = task::spawn_blocking(move || {
            serde_json::from_slice::<BomDocument>(&bytes)
                .map_err(|e| IngestError::JsonParse(path_buf, e))
        })
        .await??;

        Ok(document.observations.data)
    }

    /// Reads `path` and inserts every usable record into `store`.
    ///
    /// Records without an air temperature or with an unparseable timestamp are
    /// logged and skipped. A file that cannot be read or parsed is an error and
    /// leaves the store untouched.
    pub async fn ingest_file(
        store: &mut ObservationStore,
        path: &Path,
    ) -> Result<IngestSummary, IngestError> {
        let records = Self::read_file(path).await?;
        let mut summary = Self::ingest_records(store, &records);
        summary.files = 1;
        info!(
            "Ingested {}: {} records, {} stored, {} duplicates, {} discarded",
            path.display(),
            summary.records,
            summary.stored,
            summary.duplicates,
            summary.discarded
        );
        Ok(summary)
    }

    /// Inserts already-parsed records into `store`.
    pub fn ingest_records(store: &mut ObservationStore, records: &[RawObservation]) -> IngestSummary {
        let mut summary = IngestSummary {
            records: records.len(),
            ..Default::default()
        };
        for record in records {
            let before = store.len();
            match store.insert(record) {
                Ok(()) if store.len() > before => summary.stored += 1,
                Ok(()) => summary.duplicates += 1,
                Err(reason) => {
                    warn!("Discarding record: {}", reason);
                    summary.discarded += 1;
                }
            }
        }
        summary
    }
}
