//! Converts collected engine frames into typed report rows.

use crate::engine::columns::*;
use crate::engine::error::AggregationError;
use crate::types::climate::{DailyPeriodStat, LocationSummary, PeriodSummary, TempRange};
use crate::types::diurnal_period::DiurnalPeriod;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Retrieves a column by name from a DataFrame.
fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, AggregationError> {
    df.column(col)
        .map_err(|e| AggregationError::ColumnNotFound(col.to_string(), e))
}

fn f64_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Float64Chunked, AggregationError> {
    Ok(get_column(df, col)?.f64()?)
}

fn i64_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Int64Chunked, AggregationError> {
    Ok(get_column(df, col)?.i64()?)
}

fn i32_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Int32Chunked, AggregationError> {
    Ok(get_column(df, col)?.i32()?)
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, AggregationError> {
    value.ok_or_else(|| AggregationError::UnexpectedNull {
        column: column.to_string(),
        row,
    })
}

fn date_from_day(day: i32) -> Result<NaiveDate, AggregationError> {
    NaiveDate::from_num_days_from_ce_opt(day).ok_or(AggregationError::InvalidDayNumber(day))
}

fn period_from_rank(rank: i32) -> Result<DiurnalPeriod, AggregationError> {
    DiurnalPeriod::from_rank(rank).ok_or(AggregationError::InvalidPeriodRank(rank))
}

fn count_from_i64(count: i64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn location_name(names: &BTreeMap<i64, String>, location_id: i64) -> String {
    names
        .get(&location_id)
        .cloned()
        .unwrap_or_else(|| location_id.to_string())
}

/// Builds one [`DailyPeriodStat`] per row of a collected daily period frame.
///
/// Rows keep the frame's order.
pub fn daily_period_stats(
    df: &DataFrame,
    names: &BTreeMap<i64, String>,
) -> Result<Vec<DailyPeriodStat>, AggregationError> {
    let location_ids = i64_column(df, COL_LOCATION_ID)?;
    let days = i32_column(df, COL_DAY)?;
    let periods = i32_column(df, COL_PERIOD)?;
    let mean_temps = f64_column(df, COL_MEAN_TEMP)?;
    let spreads = f64_column(df, COL_TEMP_SPREAD)?;
    let humidities = f64_column(df, COL_MEAN_HUMIDITY)?;
    let cloudiness = f64_column(df, COL_CLOUDINESS)?;
    let samples = i64_column(df, COL_SAMPLES)?;
    let deltas = f64_column(df, COL_DELTA)?;

    (0..df.height())
        .map(|row| {
            let location_id = required(location_ids.get(row), COL_LOCATION_ID, row)?;
            Ok(DailyPeriodStat {
                location_id,
                location_name: location_name(names, location_id),
                date: date_from_day(required(days.get(row), COL_DAY, row)?)?,
                period: period_from_rank(required(periods.get(row), COL_PERIOD, row)?)?,
                mean_temp: required(mean_temps.get(row), COL_MEAN_TEMP, row)?,
                temp_spread: required(spreads.get(row), COL_TEMP_SPREAD, row)?,
                mean_humidity: humidities.get(row),
                cloudiness: required(cloudiness.get(row), COL_CLOUDINESS, row)?,
                samples: count_from_i64(required(samples.get(row), COL_SAMPLES, row)?),
                delta: deltas.get(row),
            })
        })
        .collect()
}

/// Groups a collected summary frame into one [`LocationSummary`] per location.
///
/// Locations are ordered by name, then id; periods keep the frame's order.
pub fn location_summaries(
    df: &DataFrame,
    names: &BTreeMap<i64, String>,
) -> Result<Vec<LocationSummary>, AggregationError> {
    let location_ids = i64_column(df, COL_LOCATION_ID)?;
    let periods = i32_column(df, COL_PERIOD)?;
    let typical_temps = f64_column(df, COL_TYPICAL_TEMP)?;
    let typical_spreads = f64_column(df, COL_TYPICAL_SPREAD)?;
    let min_temps = f64_column(df, COL_MIN_TEMP)?;
    let max_temps = f64_column(df, COL_MAX_TEMP)?;
    let abs_deltas = f64_column(df, COL_TYPICAL_ABS_DELTA)?;
    let humidities = f64_column(df, COL_TYPICAL_HUMIDITY)?;
    let cloudiness = f64_column(df, COL_TYPICAL_CLOUDINESS)?;
    let days = i64_column(df, COL_DAYS)?;

    let mut by_location: BTreeMap<i64, Vec<PeriodSummary>> = BTreeMap::new();
    for row in 0..df.height() {
        let location_id = required(location_ids.get(row), COL_LOCATION_ID, row)?;
        let summary = PeriodSummary {
            period: period_from_rank(required(periods.get(row), COL_PERIOD, row)?)?,
            typical_temp: required(typical_temps.get(row), COL_TYPICAL_TEMP, row)?,
            typical_spread: required(typical_spreads.get(row), COL_TYPICAL_SPREAD, row)?,
            temp_range: TempRange {
                min: required(min_temps.get(row), COL_MIN_TEMP, row)?,
                max: required(max_temps.get(row), COL_MAX_TEMP, row)?,
            },
            typical_abs_delta: abs_deltas.get(row),
            typical_humidity: humidities.get(row),
            typical_cloudiness: required(cloudiness.get(row), COL_TYPICAL_CLOUDINESS, row)?,
            days: count_from_i64(required(days.get(row), COL_DAYS, row)?),
        };
        by_location.entry(location_id).or_default().push(summary);
    }

    let mut summaries: Vec<LocationSummary> = by_location
        .into_iter()
        .map(|(location_id, periods)| LocationSummary {
            location_id,
            location_name: location_name(names, location_id),
            periods,
        })
        .collect();
    summaries.sort_by(|a, b| {
        a.location_name
            .cmp(&b.location_name)
            .then(a.location_id.cmp(&b.location_id))
    });
    Ok(summaries)
}
