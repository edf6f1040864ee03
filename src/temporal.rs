// ⏰ Temporal Model - "now" is an input, not a global
//
// Timeframe filters depend on the current date. The clock is injected so the
// predicate engine stays a pure function and tests can pin "today".

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of the current local date-time
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ============================================================================
// TIME FRAME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Timeframe should be one of: past, today, upcoming (case-insensitive)")]
pub struct TimeFrameError;

/// Coarse bucket relative to today.
///
/// `Today` and `Upcoming` overlap: anything from the start of today onwards
/// is upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    /// Strictly before the start of today
    Past,
    /// Between start and end of today, inclusive
    Today,
    /// At or after the start of today
    Upcoming,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 3] = [TimeFrame::Past, TimeFrame::Today, TimeFrame::Upcoming];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Past => "past",
            TimeFrame::Today => "today",
            TimeFrame::Upcoming => "upcoming",
        }
    }

    /// Does `datetime` fall in this bucket, given the current date?
    pub fn matches(&self, datetime: NaiveDateTime, today: NaiveDate) -> bool {
        let start_of_today = today.and_time(NaiveTime::default());
        let end_of_today = today.and_time(end_of_day());

        match self {
            TimeFrame::Past => datetime < start_of_today,
            TimeFrame::Today => start_of_today <= datetime && datetime <= end_of_today,
            TimeFrame::Upcoming => datetime >= start_of_today,
        }
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or_default()
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s))
            .ok_or(TimeFrameError)
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
