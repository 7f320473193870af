//! Unit conversion and display formatting
//!
//! Distances are carried in nautical miles and times in decimal hours
//! everywhere in the crate; these helpers turn them into the strings the
//! presentation layer shows.

use crate::types::Timestamp;
use chrono::{DateTime, SecondsFormat, Utc};

/// Exact length of the international nautical mile
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// Convert meters to nautical miles
pub fn meters_to_nm(meters: f64) -> f64 {
    meters / METERS_PER_NAUTICAL_MILE
}

/// Format decimal hours as `"Hh Mm"`, truncating both parts
///
/// Non-finite and negative inputs format as `"0h 0m"`.
pub fn format_duration(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0h 0m".to_string();
    }
    let whole_hours = hours.trunc();
    let minutes = ((hours - whole_hours) * 60.0).trunc();
    format!("{}h {}m", whole_hours as u64, minutes as u64)
}

/// Format a distance the way leg tables show it (two decimals)
pub fn format_distance_nm(nm: f64) -> String {
    format!("{:.2} nm", nm)
}

/// Format a bearing as whole degrees true
pub fn format_bearing(degrees: f64) -> String {
    format!("{:.0}° True", degrees)
}

/// UTC date-time for a Unix timestamp, `None` past chrono's range
pub fn to_utc(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(timestamp).ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// UTC wall-clock `HH:MM` for a Unix timestamp
///
/// Timestamps chrono cannot represent show as `--:--`.
pub fn format_clock(timestamp: Timestamp) -> String {
    match to_utc(timestamp) {
        Some(time) => time.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

/// RFC 3339 UTC timestamp with whole seconds, e.g. `2024-02-29T12:00:00Z`
pub fn format_rfc3339(timestamp: Timestamp) -> Option<String> {
    to_utc(timestamp).map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_truncates() {
        assert_eq!(format_duration(0.5), "0h 30m");
        assert_eq!(format_duration(1.75), "1h 45m");
        assert_eq!(format_duration(2.999), "2h 59m");
        assert_eq!(format_duration(0.0), "0h 0m");
    }

    #[test]
    fn test_format_duration_non_finite() {
        assert_eq!(format_duration(f64::INFINITY), "0h 0m");
        assert_eq!(format_duration(f64::NAN), "0h 0m");
        assert_eq!(format_duration(-3.0), "0h 0m");
    }

    #[test]
    fn test_meters_to_nm() {
        assert!((meters_to_nm(1852.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(meters_to_nm(0.0), 0.0);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_distance_nm(6.1234), "6.12 nm");
        assert_eq!(format_bearing(61.4), "61° True");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(86_400 + 13 * 3600 + 7 * 60 + 59), "13:07");
        assert_eq!(format_clock(u64::MAX), "--:--");
    }

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(format_rfc3339(0).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(
            format_rfc3339(1_700_000_000).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
        // 2024-02-29T12:00:00Z
        assert_eq!(
            format_rfc3339(1_709_208_000).as_deref(),
            Some("2024-02-29T12:00:00Z")
        );
        assert_eq!(format_rfc3339(u64::MAX), None);
    }
}
