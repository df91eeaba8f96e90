use crate::types::diurnal_period::DiurnalPeriod;
use polars::prelude::{col, lit, when, DataType, Expr};

// Observation frame
pub const COL_LOCATION_ID: &str = "location_id";
pub const COL_DAY: &str = "day"; // days since 0001-01-01 (chrono num_days_from_ce)
pub const COL_SECONDS: &str = "seconds"; // seconds since local midnight
pub const COL_AIR_TEMP: &str = "air_temp";
pub const COL_APPARENT_TEMP: &str = "apparent_temp";
pub const COL_HUMIDITY: &str = "relative_humidity";
pub const COL_CLOUD_OKTAS: &str = "cloud_oktas";

// Added by the normalizer
pub const COL_PERIOD: &str = "period"; // DiurnalPeriod::rank

// Daily period stats
pub const COL_MEAN_TEMP: &str = "mean_temp";
pub const COL_TEMP_SPREAD: &str = "temp_spread";
pub const COL_MEAN_HUMIDITY: &str = "mean_humidity";
pub const COL_CLOUDINESS: &str = "cloudiness";
pub const COL_SAMPLES: &str = "samples";
pub const COL_DELTA: &str = "delta";

// Location summaries
pub const COL_TYPICAL_TEMP: &str = "typical_temp";
pub const COL_TYPICAL_SPREAD: &str = "typical_spread";
pub const COL_MIN_TEMP: &str = "min_temp";
pub const COL_MAX_TEMP: &str = "max_temp";
pub const COL_TYPICAL_ABS_DELTA: &str = "typical_abs_delta";
pub const COL_TYPICAL_HUMIDITY: &str = "typical_humidity";
pub const COL_TYPICAL_CLOUDINESS: &str = "typical_cloudiness";
pub const COL_DAYS: &str = "days";

/// Expression mapping [`COL_SECONDS`] to the rank of the [`DiurnalPeriod`] whose
/// window contains it. Built from [`DiurnalPeriod::windows`] so the frame logic
/// and the Rust-side lookup share one definition.
///
/// Seconds outside `[0, 86400)` map to `-1`.
pub fn period_rank_expr() -> Expr {
    DiurnalPeriod::ALL
        .iter()
        .flat_map(|period| {
            period
                .windows()
                .iter()
                .map(move |&(start, end)| (period.rank(), start, end))
        })
        .fold(lit(-1i32), |otherwise, (rank, start, end)| {
            when(
                col(COL_SECONDS)
                    .gt_eq(lit(start))
                    .and(col(COL_SECONDS).lt(lit(end))),
            )
            .then(lit(rank))
            .otherwise(otherwise)
        })
        .cast(DataType::Int32)
}

/// Cloud oktas restricted to real readings, dropping the unknown sentinel.
pub fn valid_cloud_oktas() -> Expr {
    col(COL_CLOUD_OKTAS).filter(col(COL_CLOUD_OKTAS).gt_eq(lit(0i32)))
}
