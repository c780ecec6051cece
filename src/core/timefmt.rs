use crate::core::content::display_text;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const PLACEHOLDER: &str = "-";

const OUTPUT_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Formats a `Time` cell for display. Never fails: unparseable input is
/// returned as-is and null becomes [`PLACEHOLDER`].
pub fn format_timestamp(value: &Value) -> String {
    match value {
        Value::String(raw) => format_timestamp_str(raw),
        other => display_text(other).unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// `"2024-03-05 14:30:00"` becomes `"Mar 5, 2024, 2:30 PM"`.
pub fn format_timestamp_str(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let candidate = raw.trim().replacen(' ', "T", 1);
    match parse_timestamp(&candidate) {
        Some(parsed) => parsed.format(OUTPUT_FORMAT).to_string(),
        None => {
            tracing::debug!("Leaving unparseable timestamp as-is: {}", raw);
            raw.to_string()
        }
    }
}

fn parse_timestamp(candidate: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(candidate, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(candidate) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
