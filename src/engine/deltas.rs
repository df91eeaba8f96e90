//! Day-over-day change of each period's mean temperature.

use crate::engine::aggregator::DailyPeriodLazyFrame;
use crate::engine::columns::*;
use polars::prelude::*;

/// Adds [`COL_DELTA`]: `mean_temp` minus the `mean_temp` of the nearest strictly
/// earlier day that has data for the same (location, period).
///
/// The predecessor is the previous observed day, not the previous calendar day, so
/// gaps left by missing input files are bridged. The earliest day of each
/// (location, period) gets a null delta, never zero.
///
/// Aggregated rows are unique per (location, day, period), so after sorting each
/// partition by day a shift of one row is exactly the nearest earlier day.
pub fn with_day_to_day_deltas(daily: DailyPeriodLazyFrame) -> DailyPeriodLazyFrame {
    let previous_mean = col(COL_MEAN_TEMP)
        .shift(lit(1))
        .over([col(COL_LOCATION_ID), col(COL_PERIOD)]);

    let frame = daily
        .frame
        .sort(
            [COL_LOCATION_ID, COL_PERIOD, COL_DAY],
            SortMultipleOptions::default(),
        )
        .with_column((col(COL_MEAN_TEMP) - previous_mean).alias(COL_DELTA));

    DailyPeriodLazyFrame::new(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(rows: &[(i64, i32, i32, f64)]) -> PolarsResult<DailyPeriodLazyFrame> {
        let frame = df!(
            COL_LOCATION_ID => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            COL_PERIOD => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            COL_DAY => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            COL_MEAN_TEMP => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        )?
        .lazy();
        Ok(DailyPeriodLazyFrame::new(frame))
    }

    fn deltas(df: &DataFrame) -> PolarsResult<Vec<Option<f64>>> {
        Ok(df.column(COL_DELTA)?.f64()?.into_iter().collect())
    }

    #[test]
    fn test_delta_chain_uses_nearest_predecessor() -> PolarsResult<()> {
        // Days 100, 101 and 105 (a gap) for one location and period, given out of order.
        let input = daily(&[(1, 2, 105, 20.0), (1, 2, 100, 10.0), (1, 2, 101, 13.0)])?;
        let df = with_day_to_day_deltas(input).frame.collect()?;
        dbg!(&df);

        assert_eq!(deltas(&df)?, vec![None, Some(3.0), Some(7.0)]);
        Ok(())
    }

    #[test]
    fn test_partitions_do_not_leak_into_each_other() -> PolarsResult<()> {
        let input = daily(&[
            (1, 0, 100, 5.0),
            (1, 1, 100, 8.0),
            (1, 1, 101, 9.5),
            (2, 1, 101, 30.0),
        ])?;
        let df = with_day_to_day_deltas(input).frame.collect()?;

        // Sorted: (1,0,100) (1,1,100) (1,1,101) (2,1,101)
        assert_eq!(deltas(&df)?, vec![None, None, Some(1.5), None]);
        Ok(())
    }

    #[test]
    fn test_single_day_has_no_delta() -> PolarsResult<()> {
        let df = with_day_to_day_deltas(daily(&[(9, 3, 100, 12.0)])?).frame.collect()?;
        assert_eq!(deltas(&df)?, vec![None]);
        Ok(())
    }
}
