//! Reassigns late-evening samples to the following day so the overnight period,
//! which straddles midnight, falls on a single observation day.

use crate::engine::columns::*;
use crate::types::diurnal_period::OVERNIGHT_START_SECONDS;
use chrono::{Datelike, NaiveDate};
use polars::prelude::{col, lit, when, LazyFrame};

/// Observations with normalized day numbers and a period rank column.
///
/// Schema: the observation columns plus [`COL_PERIOD`]; [`COL_DAY`] holds the
/// normalized day.
#[derive(Clone)]
pub struct NormalizedLazyFrame {
    pub frame: LazyFrame,
}

/// Shifts samples at or after 22:00 onto the next day.
///
/// Samples at or after 22:00 on the last raw date in the data are dropped: their
/// overnight period would end past the data and is necessarily incomplete.
/// Samples before 06:00 need no shift, they already sit on the day their
/// overnight period ends.
#[derive(Debug, Clone, Copy)]
pub struct DayNormalizer {
    last_raw_day: i32,
}

impl DayNormalizer {
    /// `last_raw_date` is the latest raw date across the whole store, not per location.
    pub fn new(last_raw_date: NaiveDate) -> Self {
        Self {
            last_raw_day: last_raw_date.num_days_from_ce(),
        }
    }

    pub fn normalize(&self, observations: LazyFrame) -> NormalizedLazyFrame {
        let late_evening = col(COL_SECONDS).gt_eq(lit(OVERNIGHT_START_SECONDS));

        let frame = observations
            .filter(
                col(COL_SECONDS)
                    .lt(lit(OVERNIGHT_START_SECONDS))
                    .or(col(COL_DAY).lt(lit(self.last_raw_day))),
            )
            .with_columns([
                when(late_evening)
                    .then(col(COL_DAY) + lit(1i32))
                    .otherwise(col(COL_DAY))
                    .alias(COL_DAY),
                period_rank_expr().alias(COL_PERIOD),
            ]);

        NormalizedLazyFrame { frame }
    }
}
