//! Calendar periods and data ranges.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

use super::error::SlotwalkError;
use super::trade::Trade;

/// A closed calendar-date range `[start, end]`.
///
/// A timestamp falls inside when its date is within the range, so the end
/// day is covered through 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SlotwalkError> {
        if start > end {
            return Err(SlotwalkError::InvalidPeriod {
                name: "date".into(),
                reason: format!("start {start} is after end {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Like [`Period::new`] but names the period in the error.
    pub fn named(name: &str, start: NaiveDate, end: NaiveDate) -> Result<Self, SlotwalkError> {
        Self::new(start, end).map_err(|_| {
            SlotwalkError::invalid_period(name, format!("start {start} is after end {end}"))
        })
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        let date = at.date();
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// First and last entry dates of a trade log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub trades: usize,
}

impl DataRange {
    pub fn of(trades: &[Trade]) -> Option<Self> {
        let first = trades.iter().map(|t| t.entry_time.date()).min()?;
        let last = trades.iter().map(|t| t.entry_time.date()).max()?;
        Some(Self {
            first,
            last,
            trades: trades.len(),
        })
    }

    pub fn as_period(&self) -> Period {
        Period {
            start: self.first,
            end: self.last,
        }
    }
}

/// Lookback covers the first half of the data, forward runs from the
/// lookback's last day to the end of the data.
pub fn default_periods(range: &DataRange) -> (Period, Period) {
    let half = (range.last - range.first).num_days() / 2;
    let midpoint = range.first + chrono::Duration::days(half);
    (
        Period {
            start: range.first,
            end: midpoint,
        },
        Period {
            start: midpoint,
            end: range.last,
        },
    )
}
