//! One-decimal averages with an explicit no-data state

use serde::{Serialize, Serializer};
use std::fmt;

/// Mean rounded to one decimal, or no data
///
/// Never NaN: an empty denominator is [`Average::NoData`], not `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Average {
    /// Rounded mean
    Value(f64),
    /// Nothing to average
    #[default]
    NoData,
}

impl Average {
    /// Build from a running sum and count
    #[must_use]
    pub fn from_sum(sum: f64, count: usize) -> Self {
        if count == 0 {
            return Self::NoData;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        Self::Value(round_to(mean, 1))
    }

    /// Mean over an iterator of samples
    #[must_use]
    pub fn of(samples: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0, 0usize), |(s, c), x| (s + x, c + 1));
        Self::from_sum(sum, count)
    }

    /// Rounded value, if any
    #[inline]
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NoData => None,
        }
    }

    /// Whether there was nothing to average
    #[inline]
    #[must_use]
    pub fn is_no_data(self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.1}"),
            Self::NoData => f.write_str("N/A"),
        }
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NoData => serializer.serialize_str("N/A"),
        }
    }
}

/// Round half away from zero to `digits` decimals
#[must_use]
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Whole-number percentage of `part` in `whole`; 0 when `whole` is 0
#[must_use]
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / whole as f64;
    round_to(ratio * 100.0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_samples_is_no_data() {
        assert_eq!(Average::of(std::iter::empty()), Average::NoData);
        assert_eq!(Average::NoData.to_string(), "N/A");
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        assert_eq!(Average::of([8.0, 4.0]), Average::Value(6.0));
        assert_eq!(Average::of([8.0, 4.0]).to_string(), "6.0");
        assert_eq!(Average::of([1.0, 2.0, 2.0]).to_string(), "1.7");
    }

    #[test]
    fn serializes_sentinel() {
        assert_eq!(serde_json::to_string(&Average::NoData).unwrap(), "\"N/A\"");
        assert_eq!(serde_json::to_string(&Average::Value(6.5)).unwrap(), "6.5");
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(2, 3), 67.0);
        assert_eq!(percent(1, 8), 13.0);
        assert_eq!(percent(5, 0), 0.0);
    }
}
