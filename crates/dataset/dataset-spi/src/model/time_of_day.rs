//! Time-of-day feature.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct time-of-day feature values.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Minutes since midnight, in `[0, 1439]`.
///
/// Seconds are discarded. Two timestamps on different days with the same
/// clock time share a feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Create from a raw minute count; `None` outside `[0, 1439]`.
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Derive the feature from a civil datetime (`hour * 60 + minute`).
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        // hour() < 24 and minute() < 60, so this stays below 1440
        Self((datetime.hour() * 60 + datetime.minute()) as u16)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Feature value as a regressor input.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = String;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("{} is not a minute of the day", value))
    }
}

impl From<TimeOfDay> for u16 {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
