// Utility helpers for parsing and formatting.
//
// This module centralizes the "dirty" CSV cell handling and the display
// formatting so the rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `<scheme>://<host>/incident/<token>` anywhere in a cell, so both a
/// bare URL and a spreadsheet `=HYPERLINK("...","...")` formula resolve.
static INCIDENT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)[a-z][a-z0-9+.\-]*://[^/\s"']+/incident/([^/?#\s"',)]+)"#)
        .expect("incident url pattern is valid")
});

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces).
///
/// - Trims whitespace.
/// - Strips thousands separators like `","` before parsing.
/// - Accepts scientific notation such as `7.2E+06`.
/// - Returns `None` for text, `inf`/`NaN`, or anything else unparseable.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed cell text, or `None` when the cell is blank.
pub fn non_empty(s: Option<String>) -> Option<String> {
    let s = s?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Pull the incident token out of a link-style id cell. Plain ids are
/// returned trimmed but otherwise untouched.
pub fn extract_incident_id(cell: &str) -> String {
    match INCIDENT_URL.captures(cell) {
        Some(caps) => caps[1].to_string(),
        None => cell.trim().to_string(),
    }
}

/// Render a resolution time in minutes for the report tables.
///
/// An hour or more reads as `"2h 5m"`, anything shorter as `"45 mins"`.
/// Both parts are truncated, never rounded.
pub fn format_resolution_time(minutes: f64) -> String {
    if minutes >= 60.0 {
        let hours = (minutes / 60.0).trunc() as u64;
        let rest = (minutes % 60.0).trunc() as u64;
        format!("{}h {}m", hours, rest)
    } else {
        format!("{} mins", minutes.trunc() as i64)
    }
}

/// Lowercase `month-year` stamp used in output filenames, e.g. `june-2025`.
pub fn month_year_slug(date: NaiveDate) -> String {
    date.format("%B-%Y").to_string().to_lowercase()
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console and log
    // messages (e.g., `9,855 incidents loaded`).
    n.to_formatted_string(&Locale::en)
}
