use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

/// Sentinel value returned by `detect_date_format` when the column contains
/// RFC 3339 / ISO 8601 timestamps (e.g. `2023-01-06T22:26:28.987Z`).
pub const RFC3339_FORMAT: &str = "__rfc3339__";

/// Date formats tried when detecting a timestamp column.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m-%d-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M:%S %p",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
];

/// Detect the most likely date format from a slice of string values.
/// Returns the format string with the highest parse success rate.
pub fn detect_date_format(values: &[String]) -> Option<&'static str> {
    let sample: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let rfc3339_valid = sample
        .iter()
        .filter(|s| DateTime::parse_from_rfc3339(s).is_ok())
        .count();
    let rfc3339_score = rfc3339_valid as f64 / sample.len() as f64;

    let mut best_format: Option<&'static str> = None;
    let mut best_score: f64 = rfc3339_score;
    if rfc3339_score > 0.0 {
        best_format = Some(RFC3339_FORMAT);
    }

    for &fmt in DATE_FORMATS {
        let valid = sample
            .iter()
            .filter(|s| {
                NaiveDateTime::parse_from_str(s, fmt).is_ok()
                    || NaiveDate::parse_from_str(s, fmt).is_ok()
            })
            .count();

        let score = valid as f64 / sample.len() as f64;
        if score > best_score {
            best_score = score;
            best_format = Some(fmt);
        }
    }

    if best_score > 0.0 {
        best_format
    } else {
        None
    }
}

/// Parse a cell using a format from `detect_date_format`.
/// Offsets in RFC 3339 values are dropped; the wall-clock time is kept.
pub fn parse_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if format == RFC3339_FORMAT {
        return DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.naive_local());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        Some(dt)
    } else if let Ok(d) = NaiveDate::parse_from_str(value, format) {
        d.and_hms_opt(0, 0, 0)
    } else {
        None
    }
}

/// Convert an Excel serial date (days since 1899-12-30, fractional day = time).
/// Rounded to the millisecond.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::milliseconds(millis))
}

/// Canonical text form used when a workbook cell holds a native date.
pub fn to_cell_string(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Plot x coordinate: seconds since the Unix epoch of the naive timestamp,
/// with millisecond precision.
pub fn to_plot_seconds(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64 / 1000.0
}

pub fn from_plot_seconds(ts: f64) -> Option<NaiveDateTime> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

/// Format a plot x value as a 12-hour clock time, e.g. `08:01:15 PM`.
pub fn format_clock(ts: f64) -> String {
    match from_plot_seconds(ts) {
        Some(dt) => dt.format("%I:%M:%S %p").to_string(),
        None => format!("{ts:.0}"),
    }
}

/// Format a plot x value as a full timestamp.
/// Shows milliseconds when the timestamp has a fractional component.
pub fn format_timestamp(ts: f64) -> String {
    match from_plot_seconds(ts) {
        Some(dt) => {
            if dt.and_utc().timestamp_subsec_millis() == 0 {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
            }
        }
        None => format!("{ts:.3}"),
    }
}
