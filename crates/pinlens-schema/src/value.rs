//! Untyped value coercion
//!
//! Records arrive as loosely typed JSON. These helpers give every consumer
//! the same answer to "what string / number / instant is this value".

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

/// Whether a value counts as empty for display
///
/// Absent, null, the empty string and the empty array are all empty.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Coerce a value to its display string
///
/// - strings are returned as-is
/// - numbers use their shortest form, integral floats without `.0`
/// - booleans become `true` / `false`, null becomes empty
/// - arrays join their coerced elements with `,`
/// - objects use their `filename` or `name` member, else empty
#[must_use]
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(map) => map
            .get("filename")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// [`coerce_string`] over an optional value; absent is empty
#[inline]
#[must_use]
pub fn coerce_opt_string(value: Option<&Value>) -> String {
    value.map(coerce_string).unwrap_or_default()
}

fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Coerce a value to a number for sorting
///
/// Absent, null and blank strings are `0`; numeric strings parse after
/// trimming; booleans are `1` / `0`. Everything else is NaN.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

/// Parse the longest numeric prefix of a string
///
/// `"8/10"` gives 8, `"  4.5 stars"` gives 4.5, `"bad"` gives `None`.
#[must_use]
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Numeric reading used by aggregate math
///
/// JSON numbers are used directly, strings go through
/// [`parse_leading_float`]; anything else is not a number.
#[must_use]
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    }
    .filter(|f| !f.is_nan())
}

/// Strict numeric reading used by cell rendering
///
/// Unlike [`numeric`], trailing garbage makes the value non-numeric.
#[must_use]
pub fn strict_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Parse a date-like value
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS(.fff)` (taken as
/// UTC), plain `YYYY-MM-DD`, and numbers as epoch milliseconds.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(|ms| {
                #[allow(clippy::cast_possible_truncation)]
                let ms = ms as i64;
                Utc.timestamp_millis_opt(ms).single()
            }),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Epoch milliseconds for sorting; invalid or missing is epoch 0
#[must_use]
pub fn timestamp_millis_or_zero(value: Option<&Value>) -> i64 {
    value
        .and_then(parse_timestamp)
        .map_or(0, |dt| dt.timestamp_millis())
}

/// Truthiness of a checkbox value
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
