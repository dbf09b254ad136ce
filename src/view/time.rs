use chrono::{DateTime, Utc};

pub fn format_relative_time(timestamp: i64) -> String {
    format_relative_time_at(timestamp, Utc::now().timestamp())
}

/// Largest unit first; a month is 30 days and a year 365.
const UNITS: &[(i64, &str)] = &[
    (365 * 86_400, "year"),
    (30 * 86_400, "month"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

pub fn format_relative_time_at(timestamp: i64, now: i64) -> String {
    let elapsed = now.saturating_sub(timestamp);
    UNITS
        .iter()
        .find(|(secs, _)| elapsed >= *secs)
        .map(|&(secs, unit)| {
            let n = elapsed / secs;
            let plural = if n == 1 { "" } else { "s" };
            format!("{n} {unit}{plural} ago")
        })
        .unwrap_or_else(|| "just now".to_string())
}

/// Relative form of an ISO-8601 date, `None` if it does not parse.
pub fn relative_from_iso(date: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|d| format_relative_time(d.timestamp()))
}
