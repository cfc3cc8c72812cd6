//! Date strings in the `Date.prototype.toString` form, e.g.
//! `Tue Oct 20 2026 09:15:00 GMT+0000 (Coordinated Universal Time)`.
//!
//! Dates are always rendered in UTC, so the wire form has second precision.

use crate::error::CodecError;

use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
const UTC_ZONE_NAME: &str = "(Coordinated Universal Time)";

pub fn format_date(date: &DateTime<Utc>) -> String {
    format!("{} {UTC_ZONE_NAME}", date.format(DATE_FORMAT))
}

/// Parse the human-readable form, falling back to RFC 3339.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, CodecError> {
    let without_zone_name = text.split(" (").next().unwrap_or(text);

    DateTime::parse_from_str(without_zone_name, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| CodecError::malformed(format!("invalid date '{text}': {e}")))
}
