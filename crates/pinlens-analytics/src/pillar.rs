//! Content pillar buckets

use crate::average::percent;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Fixed content pillar bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pillar {
    /// Educational content
    Educational,
    /// Social proof
    Proof,
    /// Sales offer
    Offer,
    /// Behind-the-scenes content
    BehindTheScenes,
    /// Anything else, including missing values
    Other,
}

impl Pillar {
    /// Buckets in display order
    pub const ALL: [Pillar; 5] = [
        Pillar::Educational,
        Pillar::Proof,
        Pillar::Offer,
        Pillar::BehindTheScenes,
        Pillar::Other,
    ];

    /// Bucket name as stored in records
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Pillar::Educational => "Educational",
            Pillar::Proof => "Proof",
            Pillar::Offer => "Offer",
            Pillar::BehindTheScenes => "Behind-the-Scenes",
            Pillar::Other => "Other",
        }
    }

    /// Case-sensitive match; unknown values fold into [`Pillar::Other`]
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        raw.and_then(|value| Self::ALL.into_iter().find(|p| p.label() == value))
            .unwrap_or(Pillar::Other)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts per pillar bucket, all five always present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PillarDistribution {
    counts: [usize; 5],
}

impl PillarDistribution {
    /// All-zero distribution
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record into its bucket
    #[inline]
    pub fn increment(&mut self, pillar: Pillar) {
        self.counts[pillar.index()] += 1;
    }

    /// Count for one bucket
    #[inline]
    #[must_use]
    pub fn count(&self, pillar: Pillar) -> usize {
        self.counts[pillar.index()]
    }

    /// Sum over all buckets
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Buckets with counts, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Pillar, usize)> + '_ {
        Pillar::ALL.into_iter().map(|p| (p, self.count(p)))
    }

    /// Whole-number share of each bucket in `analyzed`
    ///
    /// Empty when nothing was analyzed.
    #[must_use]
    pub fn percentages(&self, analyzed: usize) -> Vec<(Pillar, f64)> {
        if analyzed == 0 {
            return Vec::new();
        }
        self.iter().map(|(p, c)| (p, percent(c, analyzed))).collect()
    }
}

impl Serialize for PillarDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Pillar::ALL.len()))?;
        for (pillar, count) in self.iter() {
            map.serialize_entry(pillar.label(), &count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_exact_names() {
        assert_eq!(Pillar::classify(Some("Educational")), Pillar::Educational);
        assert_eq!(Pillar::classify(Some("Behind-the-Scenes")), Pillar::BehindTheScenes);
        assert_eq!(Pillar::classify(Some("Other")), Pillar::Other);
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(Pillar::classify(Some("educational")), Pillar::Other);
        assert_eq!(Pillar::classify(Some("Lifestyle")), Pillar::Other);
        assert_eq!(Pillar::classify(None), Pillar::Other);
    }

    #[test]
    fn distribution_iterates_in_order() {
        let mut dist = PillarDistribution::new();
        dist.increment(Pillar::Offer);
        dist.increment(Pillar::Offer);
        dist.increment(Pillar::Other);

        let order: Vec<_> = dist.iter().collect();
        assert_eq!(
            order,
            vec![
                (Pillar::Educational, 0),
                (Pillar::Proof, 0),
                (Pillar::Offer, 2),
                (Pillar::BehindTheScenes, 0),
                (Pillar::Other, 1),
            ]
        );
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn percentages_empty_without_analysis() {
        assert!(PillarDistribution::new().percentages(0).is_empty());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut dist = PillarDistribution::new();
        dist.increment(Pillar::Proof);
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(
            json,
            r#"{"Educational":0,"Proof":1,"Offer":0,"Behind-the-Scenes":0,"Other":0}"#
        );
    }
}
