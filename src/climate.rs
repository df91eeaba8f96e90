//! Entry point tying the observation store to the analysis engine.
//!
//! Observations are ingested into a [`ClimateAnalyzer`], then [`ClimateAnalyzer::analyze`]
//! runs the whole batch: day normalization, per-period aggregation, day-to-day deltas,
//! and per-location summaries.

use crate::engine::aggregator::aggregate;
use crate::engine::deltas::with_day_to_day_deltas;
use crate::engine::error::AggregationError;
use crate::engine::extract::{daily_period_stats, location_summaries};
use crate::engine::normalizer::DayNormalizer;
use crate::engine::summary::summarize;
use crate::error::ClimateError;
use crate::ingest::bom_reader::{BomReader, IngestSummary};
use crate::store::backend::StoreBackend;
use crate::store::error::Discarded;
use crate::store::observation_store::ObservationStore;
use crate::types::climate::{DailyPeriodStat, DayToDayDelta, LocationSummary, ObservationRange};
use crate::types::observation::RawObservation;
use bon::bon;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Everything one analysis run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClimateReport {
    /// One row per (normalized date, period, location) with data, sorted by date,
    /// then period, then location name.
    pub daily: Vec<DailyPeriodStat>,
    /// Raw date span of the store; `None` when nothing was stored.
    pub range: Option<ObservationRange>,
    /// One entry per location, ordered by name.
    pub summaries: Vec<LocationSummary>,
}

impl ClimateReport {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Defined day-to-day deltas, in the same order as [`ClimateReport::daily`].
    pub fn deltas(&self) -> impl Iterator<Item = DayToDayDelta> + '_ {
        self.daily.iter().filter_map(DailyPeriodStat::day_to_day_delta)
    }
}

/// Collects observations and computes diurnal climate statistics over them.
///
/// # Examples
///
/// ```rust
/// use bom_climate::{ClimateAnalyzer, StoreBackend};
///
/// let analyzer = ClimateAnalyzer::builder()
///     .backend(StoreBackend::InMemory)
///     .build();
/// let report = analyzer.analyze().unwrap();
/// assert!(report.is_empty());
/// ```
#[derive(Debug)]
pub struct ClimateAnalyzer {
    store: ObservationStore,
}

impl Default for ClimateAnalyzer {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl ClimateAnalyzer {
    /// Creates an analyzer with an empty store.
    ///
    /// `backend` defaults to [`StoreBackend::InMemory`]. The backend only decides
    /// where the snapshot handed to the engine lives; results are the same either way.
    #[builder]
    pub fn new(backend: Option<StoreBackend>) -> Self {
        let backend = backend.unwrap_or_default();
        info!("Using {:?} observation store", backend);
        Self {
            store: ObservationStore::new(backend),
        }
    }

    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    /// Validates and stores a single record. Duplicate keys are ignored.
    pub fn insert(&mut self, record: &RawObservation) -> Result<(), Discarded> {
        self.store.insert(record)
    }

    /// Ingests one BoM observation JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Ingest`] if the file cannot be read or is not valid
    /// BoM JSON. Individual unusable records are skipped, not errors.
    pub async fn ingest_file(&mut self, path: &Path) -> Result<IngestSummary, ClimateError> {
        Ok(BomReader::ingest_file(&mut self.store, path).await?)
    }

    /// Ingests files one after another. Stops at the first file that cannot be read.
    pub async fn ingest_files<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<IngestSummary, ClimateError> {
        let mut total = IngestSummary::default();
        for path in paths {
            total += self.ingest_file(path.as_ref()).await?;
        }
        info!(
            "Ingested {} files: {} records, {} stored, {} duplicates, {} discarded",
            total.files, total.records, total.stored, total.duplicates, total.discarded
        );
        Ok(total)
    }

    /// Runs the full analysis over everything stored so far.
    ///
    /// An empty store yields an empty report rather than an error.
    pub fn analyze(&self) -> Result<ClimateReport, ClimateError> {
        let Some(range) = self.store.date_range() else {
            warn!("No usable observations to analyze");
            return Ok(ClimateReport::default());
        };

        // Must outlive every collect below when backed by a temp file.
        let snapshot = self.store.snapshot()?;

        let normalized = DayNormalizer::new(range.last).normalize(snapshot.frame.clone());
        let daily = with_day_to_day_deltas(aggregate(&normalized));

        let daily_df = daily
            .frame
            .clone()
            .collect()
            .map_err(AggregationError::from)?;
        let summary_df = summarize(&daily, &normalized)
            .collect()
            .map_err(AggregationError::from)?;

        let names = self.store.locations();
        let mut rows = daily_period_stats(&daily_df, names)?;
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.period.cmp(&b.period))
                .then_with(|| a.location_name.cmp(&b.location_name))
                .then(a.location_id.cmp(&b.location_id))
        });
        let summaries = location_summaries(&summary_df, names)?;

        info!(
            "Analyzed {} observations into {} daily period rows for {} locations",
            self.store.len(),
            rows.len(),
            summaries.len()
        );

        Ok(ClimateReport {
            daily: rows,
            range: Some(range),
            summaries,
        })
    }
}
