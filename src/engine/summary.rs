//! Whole-range statistics per (location, period).

use crate::engine::aggregator::DailyPeriodLazyFrame;
use crate::engine::columns::*;
use crate::engine::normalizer::NormalizedLazyFrame;
use crate::types::climate::CLOUDINESS_UNKNOWN;
use polars::prelude::*;

/// Folds daily period rows (with deltas) into one row per (location, period).
///
/// Temperature, spread and humidity are two-stage means: each day contributes its
/// own pre-averaged value once, however many samples it had. Null deltas and null
/// humidities are skipped by the means rather than counted as zero.
///
/// Cloudiness is the mean over all normalized samples with a cloud reading, or
/// [`CLOUDINESS_UNKNOWN`] when there are none.
///
/// Output is sorted by location then period.
pub fn summarize(daily: &DailyPeriodLazyFrame, normalized: &NormalizedLazyFrame) -> LazyFrame {
    let keys = [col(COL_LOCATION_ID), col(COL_PERIOD)];

    let per_day = daily.frame.clone().group_by(keys.clone()).agg([
        col(COL_MEAN_TEMP).mean().alias(COL_TYPICAL_TEMP),
        col(COL_TEMP_SPREAD).mean().alias(COL_TYPICAL_SPREAD),
        col(COL_MEAN_TEMP).min().alias(COL_MIN_TEMP),
        col(COL_MEAN_TEMP).max().alias(COL_MAX_TEMP),
        col(COL_DELTA).abs().mean().alias(COL_TYPICAL_ABS_DELTA),
        col(COL_MEAN_HUMIDITY).mean().alias(COL_TYPICAL_HUMIDITY),
        col(COL_MEAN_TEMP).count().alias(COL_DAYS),
    ]);

    let cloud = normalized
        .frame
        .clone()
        .group_by(keys.clone())
        .agg([valid_cloud_oktas().mean().alias(COL_TYPICAL_CLOUDINESS)]);

    per_day
        .join(cloud, keys.clone(), keys, JoinArgs::new(JoinType::Left))
        .select([
            col(COL_LOCATION_ID).cast(DataType::Int64),
            col(COL_PERIOD).cast(DataType::Int32),
            col(COL_TYPICAL_TEMP).cast(DataType::Float64),
            col(COL_TYPICAL_SPREAD).cast(DataType::Float64),
            col(COL_MIN_TEMP).cast(DataType::Float64),
            col(COL_MAX_TEMP).cast(DataType::Float64),
            col(COL_TYPICAL_ABS_DELTA).cast(DataType::Float64),
            col(COL_TYPICAL_HUMIDITY).cast(DataType::Float64),
            col(COL_TYPICAL_CLOUDINESS)
                .cast(DataType::Float64)
                .fill_null(lit(CLOUDINESS_UNKNOWN)),
            col(COL_DAYS).cast(DataType::Int64),
        ])
        .sort([COL_LOCATION_ID, COL_PERIOD], SortMultipleOptions::default())
}
