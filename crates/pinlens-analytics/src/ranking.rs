//! Frequency rankings
//!
//! Every ranking is a stable sort by count descending over an
//! insertion-ordered map, so equal counts keep first-seen order.

use crate::average::percent;
use indexmap::IndexMap;
use serde::Serialize;

/// One ranked entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    /// Entry key
    pub key: String,
    /// Occurrences
    pub count: usize,
    /// Whole-number share of the ranking base
    pub share: f64,
}

/// Rank a frequency map by count descending
///
/// `base` is the denominator for [`Ranked::share`].
#[must_use]
pub fn rank(counts: &IndexMap<String, usize>, base: usize) -> Vec<Ranked> {
    let mut entries: Vec<_> = counts.iter().collect();
    // slice::sort_by is stable
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .map(|(key, &count)| Ranked {
            key: key.clone(),
            count,
            share: percent(count, base),
        })
        .collect()
}

/// Count occurrences of each key, first-seen order
#[must_use]
pub fn tally<I, S>(keys: I) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts = IndexMap::new();
    for key in keys {
        *counts.entry(key.into()).or_insert(0) += 1;
    }
    counts
}

/// Key with the strictly greatest count; the first such key on ties
#[must_use]
pub fn first_max(counts: &IndexMap<String, usize>) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (key, &count) in counts {
        if best.map_or(count > 0, |(_, max)| count > max) {
            best = Some((key.as_str(), count));
        }
    }
    best.map(|(key, _)| key)
}
