//! Time conventions.
//!
//! Timestamps are Unix epoch milliseconds (`i64`). Segment geometry is kept
//! in fractional minutes, the unit operators think in.

use chrono::{DateTime, SecondsFormat, Utc};

/// Epoch milliseconds.
pub type TimestampMs = i64;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;

pub fn minutes_to_ms(minutes: f64) -> i64 {
    (minutes * MS_PER_MINUTE as f64).round() as i64
}

pub fn ms_to_minutes(ms: i64) -> f64 {
    ms as f64 / MS_PER_MINUTE as f64
}

/// Format epoch milliseconds as an ISO 8601 UTC string with millisecond precision.
pub fn format_iso8601(ts: TimestampMs) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse an ISO 8601 / RFC 3339 timestamp (any offset) into epoch milliseconds.
pub fn parse_iso8601(s: &str) -> Option<TimestampMs> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.timestamp_millis())
}
