//! Raw and stored forms of a single weather observation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// Sentinel stored in `cloud_oktas` when cloud cover was not reported.
pub const CLOUD_OKTAS_UNKNOWN: i32 = -1;

/// Format of `local_date_time_full` in BoM observation records.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Top level of a BoM observation JSON file.
#[derive(Debug, Deserialize)]
pub struct BomDocument {
    pub observations: BomObservations,
}

#[derive(Debug, Deserialize)]
pub struct BomObservations {
    #[serde(default)]
    pub data: Vec<RawObservation>,
}

/// One observation record as published by the Bureau of Meteorology.
///
/// Only the fields the analysis uses are read; anything else in the record is
/// ignored. Every measurement may be `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObservation {
    /// WMO station number, used as the location identifier.
    pub wmo: i64,
    /// Station display name.
    pub name: String,
    /// Local timestamp, `YYYYMMDDHHMMSS`.
    pub local_date_time_full: String,
    #[serde(default)]
    pub air_temp: Option<f64>,
    #[serde(default)]
    pub apparent_t: Option<f64>,
    #[serde(default)]
    pub rel_hum: Option<f64>,
    #[serde(default)]
    pub cloud_oktas: Option<i32>,
}

impl RawObservation {
    /// Parses `local_date_time_full` into a local date and time.
    pub fn local_date_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.local_date_time_full, LOCAL_TIMESTAMP_FORMAT).ok()
    }
}

/// Primary key of a stored observation. Ordered by location, then date, then time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationKey {
    pub location_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// A validated sample as kept by the observation store.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub air_temp: f64,
    /// Falls back to `air_temp` when the record had none.
    pub apparent_temp: f64,
    pub relative_humidity: Option<f64>,
    /// 0-8, or [`CLOUD_OKTAS_UNKNOWN`].
    pub cloud_oktas: i32,
}

impl Observation {
    pub fn key(&self) -> ObservationKey {
        ObservationKey {
            location_id: self.location_id,
            date: self.date,
            time: self.time,
        }
    }
}
