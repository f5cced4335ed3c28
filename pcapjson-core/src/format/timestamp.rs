//! Capture timestamp formatting.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::io::{Timestamp, TimestampPrecision};

/// Render a capture timestamp as ISO-8601 / RFC 3339 in UTC.
///
/// Always carries six fractional digits, or nine when the container
/// records sub-microsecond resolution. Returns `None` when the timestamp
/// is outside the representable calendar range.
///
/// # Example
///
/// ```
/// use pcapjson_core::format::format_timestamp;
/// use pcapjson_core::io::{Timestamp, TimestampPrecision};
///
/// let ts = Timestamp { secs: 1_000_000_000, nanos: 500_000_000, precision: TimestampPrecision::Micros };
/// assert_eq!(format_timestamp(&ts).as_deref(), Some("2001-09-09T01:46:40.500000Z"));
/// ```
pub fn format_timestamp(ts: &Timestamp) -> Option<String> {
    let datetime: DateTime<Utc> = DateTime::from_timestamp(ts.secs, ts.nanos)?;
    let digits = match ts.precision {
        TimestampPrecision::Micros => SecondsFormat::Micros,
        TimestampPrecision::Nanos => SecondsFormat::Nanos,
    };
    Some(datetime.to_rfc3339_opts(digits, true))
}
