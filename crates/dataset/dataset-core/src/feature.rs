//! Time-of-day feature extraction
//!
//! The same parsing path serves training datasets and single-point
//! prediction queries, so a timestamp always maps to the same feature
//! regardless of where it came from.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dataset_spi::{Cell, DatasetError, Result, TimeOfDay};

/// Naive datetime layouts accepted after RFC 3339 has been tried.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse a textual timestamp into a civil datetime.
///
/// Offsets are honoured by keeping the wall-clock time as written
/// (`2024-01-01T10:00:00+02:00` is 10:00), and a bare date means midnight.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DatasetError::InvalidTimestamp(text.to_string()));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DatasetError::InvalidTimestamp(text.to_string()))
}

/// Convert milliseconds since the Unix epoch (UTC) into a civil datetime.
pub fn timestamp_from_millis(millis: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis)
        .map(|datetime| datetime.naive_utc())
        .ok_or_else(|| DatasetError::InvalidTimestamp(millis.to_string()))
}

/// Interpret a decoded cell as a timestamp.
///
/// Text is parsed as a datetime, numbers are epoch milliseconds.
pub fn cell_to_datetime(cell: &Cell) -> Result<NaiveDateTime> {
    match cell {
        Cell::Text(text) => parse_timestamp(text),
        Cell::Number(value) if value.is_finite() => timestamp_from_millis(value.trunc() as i64),
        other => Err(DatasetError::InvalidTimestamp(other.display_value())),
    }
}

/// Time-of-day feature of a parsed datetime.
pub fn extract_datetime(datetime: &NaiveDateTime) -> TimeOfDay {
    TimeOfDay::from_datetime(datetime)
}

/// Time-of-day feature of a textual timestamp.
pub fn extract(timestamp: &str) -> Result<TimeOfDay> {
    parse_timestamp(timestamp).map(|datetime| extract_datetime(&datetime))
}
