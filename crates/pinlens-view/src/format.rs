//! Display formatters
//!
//! Pure helpers shared by cell rendering, labels and the content queue
//! cards. None of them fail; unusable input falls back to a placeholder or
//! the raw text.

use chrono::{DateTime, Utc};
use pinlens_schema::value::{is_blank, parse_timestamp};
use serde_json::Value;

/// Shown for absent values
pub const PLACEHOLDER: &str = "—";

/// Appended to truncated text
pub const ELLIPSIS: &str = "…";

const MAX_FRACTION_DIGITS: usize = 3;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Format with en-US digit grouping and at most three fraction digits
///
/// Trailing fraction zeros are dropped: `1234.5` gives `"1,234.5"`,
/// `1000000` gives `"1,000,000"`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped integer count, e.g. for table labels
#[must_use]
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Short human date, e.g. `"Jan 15, 2024"`
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Compact magnitude: `1.2M`, `15K`, `1.5K`, `999`
///
/// Non-finite input gives `"0"`.
#[must_use]
pub fn compact_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 10_000.0 {
        format!("{:.0}K", n / 1_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Age of a raw cell timestamp relative to `now`
///
/// Absent or unparseable values give the placeholder; see [`relative_age`].
#[must_use]
pub fn relative_date(raw: Option<&Value>, now: DateTime<Utc>) -> String {
    if is_blank(raw) {
        return PLACEHOLDER.to_string();
    }
    match raw.and_then(parse_timestamp) {
        Some(date) => relative_age(&date, now),
        None => PLACEHOLDER.to_string(),
    }
}

/// Age of `date` relative to `now`
///
/// `"5m ago"` (at least 1) under an hour, `"3h ago"` under a day,
/// `"Yesterday"` under two days, else the short date.
#[must_use]
pub fn relative_age(date: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - *date).num_milliseconds();
    if diff < HOUR_MS {
        format!("{}m ago", (diff / MINUTE_MS).max(1))
    } else if diff < DAY_MS {
        format!("{}h ago", diff / HOUR_MS)
    } else if diff < 2 * DAY_MS {
        "Yesterday".to_string()
    } else {
        format_date(date)
    }
}

/// First `max` characters plus an ellipsis, or `None` if `text` fits
#[must_use]
pub fn truncate(text: &str, max: usize) -> Option<String> {
    let (cut, _) = text.char_indices().nth(max)?;
    Some(format!("{}{ELLIPSIS}", &text[..cut]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn number_grouping() {
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-1520.0), "-1,520");
        assert_eq!(format_number(3.14159), "3.142");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn count_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(12_345), "12,345");
    }

    #[test]
    fn date_format() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format_date(&date), "Jan 5, 2024");
    }

    #[test]
    fn compact() {
        assert_eq!(compact_number(1_234_567.0), "1.2M");
        assert_eq!(compact_number(15_000.0), "15K");
        assert_eq!(compact_number(1_500.0), "1.5K");
        assert_eq!(compact_number(999.0), "999");
        assert_eq!(compact_number(4.2), "4.2");
        assert_eq!(compact_number(f64::NAN), "0");
    }

    #[test]
    fn relative() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let ago = |d: Duration| json!((now - d).to_rfc3339());

        assert_eq!(relative_date(Some(&ago(Duration::seconds(10))), now), "1m ago");
        assert_eq!(relative_date(Some(&ago(Duration::minutes(42))), now), "42m ago");
        assert_eq!(relative_date(Some(&ago(Duration::hours(5))), now), "5h ago");
        assert_eq!(relative_date(Some(&ago(Duration::hours(30))), now), "Yesterday");
        assert_eq!(relative_date(Some(&json!("2024-01-15")), now), "Jan 15, 2024");
        assert_eq!(relative_date(None, now), PLACEHOLDER);
        assert_eq!(relative_date(Some(&json!("someday")), now), PLACEHOLDER);
    }

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate("short", 10), None);
        assert_eq!(truncate("exactly", 7), None);
        assert_eq!(truncate("héllo wörld", 5).as_deref(), Some("héllo…"));
    }
}
