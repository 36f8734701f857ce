//! Display helpers for counters and dates

use chrono::{DateTime, Locale};

/// Rendered when a timestamp falls outside the representable calendar.
pub const INVALID_DATE: &str = "Invalid Date";

/// Compact a counter: `1500` -> `1.5K`, `2_500_000` -> `2.5M`.
///
/// One decimal place, truncated rather than rounded, so `999_999` stays
/// `999.9K` instead of turning into `1000.0K`.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{}.{}M", n / 1_000_000, (n % 1_000_000) / 100_000)
    } else if n >= 1_000 {
        format!("{}.{}K", n / 1_000, (n % 1_000) / 100)
    } else {
        n.to_string()
    }
}

/// Long Indonesian calendar date for a unix timestamp, evaluated in UTC.
///
/// `0` renders as `1 Januari 1970`. Negative values are valid pre-epoch dates.
pub fn format_date(unix_seconds: i64) -> String {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(date) => date
            .format_localized("%-d %B %Y", Locale::id_ID)
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}
