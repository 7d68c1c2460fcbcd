//! Date and time conversions between the backend and the editing forms.
//!
//! The backend speaks `DD/MM/YYYY` (occasionally an ISO timestamp) while the
//! forms edit `YYYY-MM-DD`. Conversions are textual so a value that
//! travels server → form → server comes back byte-for-byte identical.

use chrono::{NaiveDate, NaiveTime};

/// Format used by the forms while editing a date.
pub const EDIT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Wall-clock format used for start and end times.
pub const TIME_FORMAT: &str = "%H:%M";

const TIME_WITH_SECONDS_FORMAT: &str = "%H:%M:%S";

/// Converts a server date into the `YYYY-MM-DD` editing format.
///
/// Accepts `DD/MM/YYYY`, ISO timestamps (`2025-03-04T10:00:00`) and values
/// already in editing format. Anything else is returned trimmed so the
/// validator can report it.
pub fn normalize_for_edit(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.contains('/') {
        let parts: Vec<&str> = trimmed.split('/').collect();
        return match parts.as_slice() {
            [day, month, year] => format!("{year}-{month}-{day}"),
            _ => trimmed.to_string(),
        };
    }

    match trimmed.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => trimmed.to_string(),
    }
}

/// Converts an editing date (`YYYY-MM-DD`) into the wire format
/// (`DD/MM/YYYY`). Returns `None` when the value does not have three
/// dash-separated parts.
pub fn to_wire(edit_value: &str) -> Option<String> {
    let parts: Vec<&str> = edit_value.trim().split('-').collect();
    match parts.as_slice() {
        [year, month, day] if !year.is_empty() && !month.is_empty() && !day.is_empty() => {
            Some(format!("{day}/{month}/{year}"))
        }
        _ => None,
    }
}

/// Parses a date in editing format.
pub fn parse_edit_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), EDIT_DATE_FORMAT).ok()
}

/// Parses a wall-clock time, accepting both `HH:MM` and `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_WITH_SECONDS_FORMAT))
        .ok()
}

/// Normalizes a server time (`08:30:00`) to the `HH:MM` the forms edit.
pub fn normalize_time_for_edit(raw: &str) -> String {
    match parse_time(raw) {
        Some(time) => time.format(TIME_FORMAT).to_string(),
        None => raw.trim().to_string(),
    }
}
