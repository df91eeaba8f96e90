//! Per (location, day, period) statistics over normalized observations.

use crate::engine::columns::*;
use crate::engine::normalizer::NormalizedLazyFrame;
use crate::types::climate::CLOUDINESS_UNKNOWN;
use polars::prelude::*;

/// One row per non-empty (location, normalized day, period) group.
///
/// Schema: [`COL_LOCATION_ID`] `i64`, [`COL_DAY`] `i32`, [`COL_PERIOD`] `i32`,
/// [`COL_MEAN_TEMP`], [`COL_TEMP_SPREAD`], [`COL_MEAN_HUMIDITY`] (nullable),
/// [`COL_CLOUDINESS`] `f64`, [`COL_SAMPLES`] `i64`, and after
/// [`crate::engine::deltas::with_day_to_day_deltas`] also [`COL_DELTA`] (nullable).
///
/// Rows are sorted by location, period, then day.
#[derive(Clone)]
pub struct DailyPeriodLazyFrame {
    pub frame: LazyFrame,
}

impl DailyPeriodLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }
}

/// Groups normalized observations and computes mean and spread of air temperature,
/// mean humidity, and mean cloud cover.
///
/// Groups only exist where samples exist, so no row is ever zero-filled. Cloudiness
/// is averaged over samples with a cloud reading only and falls back to
/// [`CLOUDINESS_UNKNOWN`] when the group has none.
pub fn aggregate(normalized: &NormalizedLazyFrame) -> DailyPeriodLazyFrame {
    let frame = normalized
        .frame
        .clone()
        .group_by([col(COL_LOCATION_ID), col(COL_DAY), col(COL_PERIOD)])
        .agg([
            col(COL_AIR_TEMP).mean().alias(COL_MEAN_TEMP),
            (col(COL_AIR_TEMP).max() - col(COL_AIR_TEMP).min()).alias(COL_TEMP_SPREAD),
            col(COL_HUMIDITY).mean().alias(COL_MEAN_HUMIDITY),
            valid_cloud_oktas().mean().alias(COL_CLOUDINESS),
            col(COL_AIR_TEMP).count().alias(COL_SAMPLES),
        ])
        .select([
            col(COL_LOCATION_ID).cast(DataType::Int64),
            col(COL_DAY).cast(DataType::Int32),
            col(COL_PERIOD).cast(DataType::Int32),
            col(COL_MEAN_TEMP).cast(DataType::Float64),
            col(COL_TEMP_SPREAD).cast(DataType::Float64),
            col(COL_MEAN_HUMIDITY).cast(DataType::Float64),
            col(COL_CLOUDINESS)
                .cast(DataType::Float64)
                .fill_null(lit(CLOUDINESS_UNKNOWN)),
            col(COL_SAMPLES).cast(DataType::Int64),
        ])
        .sort(
            [COL_LOCATION_ID, COL_PERIOD, COL_DAY],
            SortMultipleOptions::default(),
        );

    DailyPeriodLazyFrame::new(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::diurnal_period::DiurnalPeriod;

    fn normalized(
        rows: &[(i64, i32, i32, f64, Option<f64>, i32)],
    ) -> PolarsResult<NormalizedLazyFrame> {
        let frame = df!(
            COL_LOCATION_ID => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            COL_DAY => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            COL_PERIOD => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            COL_AIR_TEMP => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
            COL_HUMIDITY => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
            COL_CLOUD_OKTAS => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
        )?
        .lazy();
        Ok(NormalizedLazyFrame { frame })
    }

    #[test]
    fn test_morning_scenario() -> PolarsResult<()> {
        let morning = DiurnalPeriod::Morning.rank();
        let input = normalized(&[
            (1, 736_511, morning, 10.0, Some(60.0), -1),
            (1, 736_511, morning, 14.0, Some(50.0), -1),
        ])?;
        let df = aggregate(&input).frame.collect()?;
        dbg!(&df);

        assert_eq!(df.height(), 1);
        assert_eq!(df.column(COL_MEAN_TEMP)?.f64()?.get(0), Some(12.0));
        assert_eq!(df.column(COL_TEMP_SPREAD)?.f64()?.get(0), Some(4.0));
        assert_eq!(df.column(COL_MEAN_HUMIDITY)?.f64()?.get(0), Some(55.0));
        assert_eq!(df.column(COL_SAMPLES)?.i64()?.get(0), Some(2));
        Ok(())
    }

    #[test]
    fn test_cloudiness_ignores_sentinel_and_reports_unknown() -> PolarsResult<()> {
        let daytime = DiurnalPeriod::Daytime.rank();
        let evening = DiurnalPeriod::Evening.rank();
        let input = normalized(&[
            (1, 10, daytime, 20.0, None, 2),
            (1, 10, daytime, 21.0, None, -1),
            (1, 10, daytime, 22.0, None, 6),
            (1, 10, evening, 18.0, None, -1),
            (1, 10, evening, 17.0, None, -1),
        ])?;
        let df = aggregate(&input).frame.collect()?;

        // Sorted by location, period, day: daytime first, then evening.
        let cloud = df.column(COL_CLOUDINESS)?.f64()?;
        assert_eq!(cloud.get(0), Some(4.0));
        assert_eq!(cloud.get(1), Some(CLOUDINESS_UNKNOWN));

        // Temperature is still aggregated when cloud cover is unknown.
        assert_eq!(df.column(COL_MEAN_TEMP)?.f64()?.get(1), Some(17.5));
        // Humidity absent everywhere stays null, not zero.
        assert_eq!(df.column(COL_MEAN_HUMIDITY)?.f64()?.get(0), None);
        Ok(())
    }

    #[test]
    fn test_groups_are_split_by_location_day_and_period() -> PolarsResult<()> {
        let overnight = DiurnalPeriod::Overnight.rank();
        let morning = DiurnalPeriod::Morning.rank();
        let input = normalized(&[
            (2, 11, overnight, 5.0, Some(90.0), 8),
            (1, 11, morning, 9.0, Some(70.0), 3),
            (1, 10, morning, 8.0, Some(75.0), 3),
            (1, 10, overnight, 4.0, Some(95.0), 7),
        ])?;
        let df = aggregate(&input).frame.collect()?;

        assert_eq!(df.height(), 4);
        let locations: Vec<Option<i64>> = df.column(COL_LOCATION_ID)?.i64()?.into_iter().collect();
        let periods: Vec<Option<i32>> = df.column(COL_PERIOD)?.i32()?.into_iter().collect();
        let days: Vec<Option<i32>> = df.column(COL_DAY)?.i32()?.into_iter().collect();
        assert_eq!(locations, vec![Some(1), Some(1), Some(1), Some(2)]);
        assert_eq!(periods, vec![Some(overnight), Some(morning), Some(morning), Some(overnight)]);
        assert_eq!(days, vec![Some(10), Some(10), Some(11), Some(11)]);
        Ok(())
    }

    #[test]
    fn test_empty_input_yields_no_rows() -> PolarsResult<()> {
        let df = aggregate(&normalized(&[])?).frame.collect()?;
        assert_eq!(df.height(), 0);
        Ok(())
    }
}
