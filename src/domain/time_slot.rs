//! Entry time slots: a weekday plus a clock minute.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::cmp::Ordering;
use std::fmt;

/// The weekday and minute at which a trade was entered.
///
/// Seconds are discarded, so 09:45:00 and 09:45:30 share a slot. Slots order
/// Monday first, then by time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    weekday: Weekday,
    hour: u32,
    minute: u32,
}

impl TimeSlot {
    /// Returns `None` when `hour` or `minute` is out of range.
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            weekday,
            hour,
            minute,
        })
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            weekday: dt.weekday(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }

    fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Full weekday name, e.g. "Monday".
    pub fn day_label(&self) -> String {
        match self.weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
        .to_string()
    }

    /// 12-hour clock label, e.g. "09:45 AM".
    pub fn time_label(&self) -> String {
        self.time().format("%I:%M %p").to_string()
    }

    fn sort_key(&self) -> (u32, u32, u32) {
        (self.weekday.num_days_from_monday(), self.hour, self.minute)
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_label(), self.time_label())
    }
}
