//! Per-field formatters applied while mapping CSV rows.
//!
//! Broker exports use a local display layout (`21-03-2024 14:30`, `B`/`S`);
//! the bulk endpoint expects `2024-03-21T14:30:00` and `BUY`/`SELL`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::FormatError;

/// Canonical layout sent to the server, whole seconds, no offset.
pub const CANONICAL_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Convert `DD-MM-YYYY HH:MM` to `YYYY-MM-DDTHH:MM:SS`.
///
/// The wall-clock value is kept as is: no timezone conversion happens.
/// A trailing `:SS` is accepted; fractional seconds are truncated.
///
/// ```
/// use tradeload::format_timestamp;
///
/// assert_eq!(format_timestamp("21-03-2024 14:30").unwrap(), "2024-03-21T14:30:00");
/// ```
pub fn format_timestamp(raw: &str) -> Result<String, FormatError> {
    parse_local_datetime(raw)
        .map(|dt| dt.format(CANONICAL_TIMESTAMP).to_string())
        .ok_or_else(|| FormatError::InvalidTimestamp(raw.trim().to_string()))
}

fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let mut parts = raw.split_whitespace();
    let date = parts.next()?;
    let time = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let mut dmy = date.split('-');
    let day: u32 = dmy.next()?.parse().ok()?;
    let month: u32 = dmy.next()?.parse().ok()?;
    let year: i32 = dmy.next()?.parse().ok()?;
    if dmy.next().is_some() {
        return None;
    }

    let mut hms = time.split(':');
    let hour: u32 = hms.next()?.parse().ok()?;
    let minute: u32 = hms.next()?.parse().ok()?;
    let second: u32 = match hms.next() {
        Some(s) => s.split('.').next()?.parse().ok()?,
        None => 0,
    };
    if hms.next().is_some() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}

/// Expand single-letter trade codes: `B` → `BUY`, `S` → `SELL`.
///
/// Surrounding whitespace is ignored when matching. Anything else is
/// returned verbatim and left for the server to reject.
pub fn format_operation(code: &str) -> String {
    match code.trim() {
        "B" => "BUY".to_string(),
        "S" => "SELL".to_string(),
        _ => code.to_string(),
    }
}
