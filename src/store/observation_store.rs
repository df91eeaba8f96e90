//! Append-only, deduplicating collection of observations.

use crate::engine::columns::*;
use crate::store::backend::{ObservationSnapshot, StoreBackend};
use crate::store::error::{Discarded, StoreError};
use crate::types::climate::ObservationRange;
use crate::types::observation::{
    Observation, ObservationKey, RawObservation, CLOUD_OKTAS_UNKNOWN,
};
use chrono::{Datelike, Timelike};
use log::debug;
use polars::prelude::*;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Holds every accepted observation, keyed by (location, date, time).
///
/// Inserting a key that is already present is a silent no-op (first write wins),
/// so overlapping input files can be ingested in any order with the same result.
#[derive(Debug, Default)]
pub struct ObservationStore {
    backend: StoreBackend,
    observations: BTreeMap<ObservationKey, Observation>,
    locations: BTreeMap<i64, String>,
}

impl ObservationStore {
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            backend,
            observations: BTreeMap::new(),
            locations: BTreeMap::new(),
        }
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    /// Validates a raw record and stores it unless its key is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Discarded`] when the record lacks an air temperature or its timestamp
    /// cannot be parsed. The store is unchanged in that case.
    pub fn insert(&mut self, record: &RawObservation) -> Result<(), Discarded> {
        let air_temp = record.air_temp.ok_or_else(|| Discarded::MissingAirTemp {
            location_id: record.wmo,
            timestamp: record.local_date_time_full.clone(),
        })?;
        let local = record
            .local_date_time()
            .ok_or_else(|| Discarded::InvalidTimestamp {
                location_id: record.wmo,
                value: record.local_date_time_full.clone(),
            })?;

        let observation = Observation {
            location_id: record.wmo,
            date: local.date(),
            time: local.time(),
            air_temp,
            apparent_temp: record.apparent_t.unwrap_or(air_temp),
            relative_humidity: record.rel_hum,
            cloud_oktas: record.cloud_oktas.unwrap_or(CLOUD_OKTAS_UNKNOWN),
        };

        match self.observations.entry(observation.key()) {
            Entry::Vacant(entry) => {
                entry.insert(observation);
                self.register_location(record.wmo, &record.name);
            }
            Entry::Occupied(_) => {
                debug!(
                    "Ignoring duplicate observation for location {} at {}",
                    record.wmo, local
                );
            }
        }
        Ok(())
    }

    fn register_location(&mut self, location_id: i64, name: &str) {
        match self.locations.entry(location_id) {
            Entry::Vacant(entry) => {
                entry.insert(name.to_string());
            }
            Entry::Occupied(entry) => {
                if entry.get() != name {
                    debug!(
                        "Keeping name '{}' for location {}, ignoring '{}'",
                        entry.get(),
                        location_id,
                        name
                    );
                }
            }
        }
    }

    /// Every stored observation, in primary-key order.
    pub fn all(&self) -> impl Iterator<Item = &Observation> {
        self.observations.values()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn location_name(&self, location_id: i64) -> Option<&str> {
        self.locations.get(&location_id).map(String::as_str)
    }

    /// Location ids and their names, ordered by id.
    pub fn locations(&self) -> &BTreeMap<i64, String> {
        &self.locations
    }

    /// First and last raw (not normalized) observation dates across all locations.
    pub fn date_range(&self) -> Option<ObservationRange> {
        let first = self.all().map(|o| o.date).min()?;
        let last = self.all().map(|o| o.date).max()?;
        Some(ObservationRange::new(first, last))
    }

    /// Projects the store into the engine's observation frame, in primary-key order.
    pub fn to_frame(&self) -> Result<DataFrame, StoreError> {
        let n = self.observations.len();
        let mut location_id = Vec::with_capacity(n);
        let mut day = Vec::with_capacity(n);
        let mut seconds = Vec::with_capacity(n);
        let mut air_temp = Vec::with_capacity(n);
        let mut apparent_temp = Vec::with_capacity(n);
        let mut humidity: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut cloud_oktas = Vec::with_capacity(n);

        for o in self.all() {
            location_id.push(o.location_id);
            day.push(o.date.num_days_from_ce());
            seconds.push(o.time.num_seconds_from_midnight() as i32);
            air_temp.push(o.air_temp);
            apparent_temp.push(o.apparent_temp);
            humidity.push(o.relative_humidity);
            cloud_oktas.push(o.cloud_oktas);
        }

        df!(
            COL_LOCATION_ID => location_id,
            COL_DAY => day,
            COL_SECONDS => seconds,
            COL_AIR_TEMP => air_temp,
            COL_APPARENT_TEMP => apparent_temp,
            COL_HUMIDITY => humidity,
            COL_CLOUD_OKTAS => cloud_oktas,
        )
        .map_err(StoreError::FrameBuild)
    }

    /// Freezes the current contents into a snapshot using the configured backend.
    pub fn snapshot(&self) -> Result<ObservationSnapshot, StoreError> {
        self.backend.snapshot(self.to_frame()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(wmo: i64, name: &str, timestamp: &str, air_temp: Option<f64>) -> RawObservation {
        RawObservation {
            wmo,
            name: name.to_string(),
            local_date_time_full: timestamp.to_string(),
            air_temp,
            apparent_t: None,
            rel_hum: Some(50.0),
            cloud_oktas: None,
        }
    }

    #[test]
    fn test_insert_applies_defaults() -> Result<(), Discarded> {
        let mut store = ObservationStore::default();
        store.insert(&record(1, "Testville", "20170701090000", Some(10.0)))?;

        let stored = store.all().next().expect("one observation stored");
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2017, 7, 1).unwrap());
        assert_eq!(stored.apparent_temp, 10.0);
        assert_eq!(stored.cloud_oktas, CLOUD_OKTAS_UNKNOWN);
        assert_eq!(stored.relative_humidity, Some(50.0));
        Ok(())
    }

    #[test]
    fn test_duplicate_key_is_idempotent() -> Result<(), Discarded> {
        let first = record(1, "Testville", "20170701090000", Some(10.0));
        let mut conflicting = first.clone();
        conflicting.air_temp = Some(99.0);

        let mut once = ObservationStore::default();
        once.insert(&first)?;

        let mut twice = ObservationStore::default();
        twice.insert(&first)?;
        twice.insert(&first)?;
        twice.insert(&conflicting)?;

        assert_eq!(twice.len(), 1);
        assert_eq!(
            once.all().collect::<Vec<_>>(),
            twice.all().collect::<Vec<_>>()
        );
        assert_eq!(twice.all().next().map(|o| o.air_temp), Some(10.0));
        Ok(())
    }

    #[test]
    fn test_missing_air_temp_is_discarded() {
        let mut store = ObservationStore::default();
        let result = store.insert(&record(1, "Testville", "20170701090000", None));
        assert!(matches!(result, Err(Discarded::MissingAirTemp { location_id: 1, .. })));
        assert!(store.is_empty());
        assert!(store.locations().is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_discarded() {
        let mut store = ObservationStore::default();
        let result = store.insert(&record(1, "Testville", "not-a-time", Some(3.0)));
        assert!(matches!(result, Err(Discarded::InvalidTimestamp { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_location_name_wins() -> Result<(), Discarded> {
        let mut store = ObservationStore::default();
        store.insert(&record(7, "Original", "20170701090000", Some(1.0)))?;
        store.insert(&record(7, "Renamed", "20170701100000", Some(2.0)))?;
        assert_eq!(store.location_name(7), Some("Original"));
        assert_eq!(store.len(), 2);
        Ok(())
    }

    #[test]
    fn test_date_range_uses_raw_dates() -> Result<(), Discarded> {
        let mut store = ObservationStore::default();
        assert!(store.date_range().is_none());

        store.insert(&record(1, "A", "20170703233000", Some(1.0)))?;
        store.insert(&record(2, "B", "20170701010000", Some(1.0)))?;
        let range = store.date_range().expect("range for non-empty store");
        assert_eq!(range.first, NaiveDate::from_ymd_opt(2017, 7, 1).unwrap());
        assert_eq!(range.last, NaiveDate::from_ymd_opt(2017, 7, 3).unwrap());
        assert_eq!(range.days, 2);
        Ok(())
    }

    #[test]
    fn test_frame_is_in_key_order_regardless_of_insertion() -> Result<(), Box<dyn std::error::Error>> {
        let records = [
            record(2, "B", "20170701120000", Some(5.0)),
            record(1, "A", "20170702060000", Some(4.0)),
            record(1, "A", "20170701230000", Some(3.0)),
        ];
        let mut forward = ObservationStore::default();
        let mut backward = ObservationStore::default();
        for r in records.iter() {
            forward.insert(r)?;
        }
        for r in records.iter().rev() {
            backward.insert(r)?;
        }

        let a = forward.to_frame()?;
        let b = backward.to_frame()?;
        assert!(a.equals_missing(&b));

        let temps: Vec<Option<f64>> = a.column(COL_AIR_TEMP)?.f64()?.into_iter().collect();
        assert_eq!(temps, vec![Some(3.0), Some(4.0), Some(5.0)]);
        let seconds: Vec<Option<i32>> = a.column(COL_SECONDS)?.i32()?.into_iter().collect();
        assert_eq!(seconds, vec![Some(23 * 3600), Some(6 * 3600), Some(12 * 3600)]);
        Ok(())
    }

    #[test]
    fn test_empty_store_builds_empty_frame() -> Result<(), StoreError> {
        let df = ObservationStore::default().to_frame()?;
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 7);
        Ok(())
    }
}
