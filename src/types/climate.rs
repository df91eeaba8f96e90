//! Derived aggregates produced by the analysis engine.

use crate::types::diurnal_period::DiurnalPeriod;
use chrono::NaiveDate;
use serde::Serialize;

/// Sentinel reported for cloudiness when no sample in the group had a cloud reading.
pub const CLOUDINESS_UNKNOWN: f64 = -1.0;

/// Aggregate of one (location, normalized date, period) group.
///
/// Only non-empty groups produce a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPeriodStat {
    pub location_id: i64,
    pub location_name: String,
    /// Normalized observation day; late-evening samples count towards the following day.
    pub date: NaiveDate,
    pub period: DiurnalPeriod,
    pub mean_temp: f64,
    /// `max - min` of air temperature within the group.
    pub temp_spread: f64,
    /// `None` when no sample in the group reported humidity.
    pub mean_humidity: Option<f64>,
    /// Mean cloud oktas over samples with a reading, or [`CLOUDINESS_UNKNOWN`].
    pub cloudiness: f64,
    /// Number of samples in the group.
    pub samples: u32,
    /// Change in `mean_temp` since the nearest earlier date with data for the same
    /// location and period. `None` for the earliest such date.
    pub delta: Option<f64>,
}

impl DailyPeriodStat {
    pub fn day_to_day_delta(&self) -> Option<DayToDayDelta> {
        self.delta.map(|delta| DayToDayDelta {
            location_id: self.location_id,
            date: self.date,
            period: self.period,
            delta,
        })
    }
}

/// Signed change of a period's mean temperature between consecutive observed dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayToDayDelta {
    pub location_id: i64,
    pub date: NaiveDate,
    pub period: DiurnalPeriod,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

/// Whole-range statistics of one period at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: DiurnalPeriod,
    /// Mean of the per-day mean temperatures.
    pub typical_temp: f64,
    /// Mean of the per-day spreads.
    pub typical_spread: f64,
    /// Lowest and highest per-day mean temperature.
    pub temp_range: TempRange,
    /// Mean absolute day-to-day change; `None` when the period has a single day.
    pub typical_abs_delta: Option<f64>,
    pub typical_humidity: Option<f64>,
    /// Mean cloud oktas over all samples with a reading, or [`CLOUDINESS_UNKNOWN`].
    pub typical_cloudiness: f64,
    /// Number of days contributing to the summary.
    pub days: u32,
}

/// Per-period summaries for one location. Periods without data are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location_id: i64,
    pub location_name: String,
    pub periods: Vec<PeriodSummary>,
}

impl LocationSummary {
    pub fn period(&self, period: DiurnalPeriod) -> Option<&PeriodSummary> {
        self.periods.iter().find(|p| p.period == period)
    }
}

/// Span of raw observation dates across every location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObservationRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    /// `last - first`, in days.
    pub days: i64,
}

impl ObservationRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            first,
            last,
            days: (last - first).num_days(),
        }
    }
}
