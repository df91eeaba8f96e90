//! Plain-text rendering of a [`ClimateReport`].
//!
//! Temperatures print with one decimal, humidity as a whole percentage, and the
//! `+/-` figure is half the spread.

use crate::climate::ClimateReport;
use crate::types::climate::{DailyPeriodStat, LocationSummary, ObservationRange};
use crate::types::diurnal_period::DiurnalPeriod;
use std::fmt;

struct Humidity(Option<f64>);

impl fmt::Display for Humidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(h) => write!(f, "{:.0}%", h),
            None => f.write_str("--%"),
        }
    }
}

impl fmt::Display for DailyPeriodStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {:.1} +/-{:.1} {}",
            self.date.format("%Y-%m-%d"),
            self.period,
            self.location_name,
            self.mean_temp,
            self.temp_spread / 2.0,
            Humidity(self.mean_humidity)
        )?;
        if let Some(delta) = self.delta {
            write!(f, " ({:+.1} on previous)", delta)?;
        }
        Ok(())
    }
}

impl fmt::Display for ObservationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Observations cover {} days, from {} to {}",
            self.days,
            self.first.format("%Y-%m-%d"),
            self.last.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for LocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.location_name)?;
        for (i, period) in DiurnalPeriod::ALL.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            match self.period(*period) {
                Some(s) => write!(
                    f,
                    "{}{} {:.1} +/-{:.1} {}",
                    sep,
                    period,
                    s.typical_temp,
                    s.typical_spread / 2.0,
                    Humidity(s.typical_humidity)
                )?,
                None => write!(f, "{}{} n/a", sep, period)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for ClimateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(range) = self.range.filter(|_| !self.is_empty()) else {
            return writeln!(f, "No usable observations");
        };
        for row in &self.daily {
            writeln!(f, "{}", row)?;
        }
        writeln!(f, "{}", range)?;
        for summary in &self.summaries {
            writeln!(f, "{}", summary)?;
        }
        Ok(())
    }
}
