//! Defines the four fixed local-time periods a day is split into, and the
//! half-open windows that assign a time of day to exactly one of them.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use std::fmt;

/// Seconds since local midnight at which the overnight period begins.
pub const OVERNIGHT_START_SECONDS: i32 = 22 * 3600;

/// Seconds in one local day; the exclusive upper bound of any time of day.
pub const SECONDS_PER_DAY: i32 = 24 * 3600;

/// One of the four fixed intervals of a local day.
///
/// Each period covers one or more half-open `[start, end)` windows measured in
/// seconds since local midnight. Together the windows tile `[00:00, 24:00)`
/// exactly once.
///
/// The derived ordering is the display order:
/// overnight < morning < daytime < evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiurnalPeriod {
    /// `[22:00, 24:00)` and `[00:00, 06:00)`, attributed to the day on which it ends.
    Overnight,
    /// `[06:00, 10:00)`
    Morning,
    /// `[10:00, 18:00)`
    Daytime,
    /// `[18:00, 22:00)`
    Evening,
}

impl DiurnalPeriod {
    /// All periods in display order.
    pub const ALL: [DiurnalPeriod; 4] = [
        DiurnalPeriod::Overnight,
        DiurnalPeriod::Morning,
        DiurnalPeriod::Daytime,
        DiurnalPeriod::Evening,
    ];

    /// The half-open `[start, end)` windows of this period, in seconds since midnight.
    pub fn windows(&self) -> &'static [(i32, i32)] {
        match self {
            DiurnalPeriod::Overnight => &[(OVERNIGHT_START_SECONDS, SECONDS_PER_DAY), (0, 6 * 3600)],
            DiurnalPeriod::Morning => &[(6 * 3600, 10 * 3600)],
            DiurnalPeriod::Daytime => &[(10 * 3600, 18 * 3600)],
            DiurnalPeriod::Evening => &[(18 * 3600, OVERNIGHT_START_SECONDS)],
        }
    }

    /// Integer rank used inside frames. Sorting by rank equals sorting by period.
    pub fn rank(&self) -> i32 {
        match self {
            DiurnalPeriod::Overnight => 0,
            DiurnalPeriod::Morning => 1,
            DiurnalPeriod::Daytime => 2,
            DiurnalPeriod::Evening => 3,
        }
    }

    pub fn from_rank(rank: i32) -> Option<DiurnalPeriod> {
        DiurnalPeriod::ALL.into_iter().find(|p| p.rank() == rank)
    }

    /// Returns the period whose window contains `seconds` since local midnight,
    /// or `None` if `seconds` lies outside `[0, 86400)`.
    pub fn containing_seconds(seconds: i32) -> Option<DiurnalPeriod> {
        DiurnalPeriod::ALL.into_iter().find(|p| {
            p.windows()
                .iter()
                .any(|&(start, end)| seconds >= start && seconds < end)
        })
    }

    /// Returns the period a local time of day falls in.
    pub fn containing(time: NaiveTime) -> DiurnalPeriod {
        // num_seconds_from_midnight is always below 86400, so a window always matches.
        Self::containing_seconds(time.num_seconds_from_midnight() as i32)
            .unwrap_or(DiurnalPeriod::Overnight)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiurnalPeriod::Overnight => "overnight",
            DiurnalPeriod::Morning => "morning",
            DiurnalPeriod::Daytime => "daytime",
            DiurnalPeriod::Evening => "evening",
        }
    }
}

impl fmt::Display for DiurnalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
