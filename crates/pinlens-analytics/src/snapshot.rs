//! Aggregate snapshot computation

use crate::average::{percent, Average};
use crate::insight::{self, Insight, UNDERUSED_SHARE};
use crate::intelligence::{latest_report, IntelligenceReport};
use crate::pillar::{Pillar, PillarDistribution};
use crate::queue::QueueStats;
use crate::ranking::{first_max, rank, tally, Ranked};
use indexmap::{IndexMap, IndexSet};
use pinlens_schema::value::numeric;
use pinlens_schema::{LogicalField, Record, TableKind, TableSet};
use serde::Serialize;

/// Hook value for analysis records without one
pub const UNKNOWN_HOOK: &str = "Unknown";

/// Derived statistics over the current record set
///
/// Recomputed wholesale on every refresh; never updated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateSnapshot {
    /// Records in the competitor pins table
    pub total_pins: usize,
    /// Records in the pin analysis table
    pub analyzed_pins: usize,
    /// Hook with the strictly greatest count, first seen on ties
    pub top_hook: Option<String>,
    /// Hook technique counts, first-seen order
    pub hook_distribution: IndexMap<String, usize>,
    /// Normalized keyword counts, first-seen order
    pub keyword_frequency: IndexMap<String, usize>,
    /// Fixed pillar buckets
    pub pillar_distribution: PillarDistribution,
    /// Mean CTA strength over numeric entries
    pub avg_cta_strength: Average,
    /// Gap notes in record order
    pub gap_opportunities: Vec<String>,
    /// Distinct competitor names, first-seen order
    pub competitors: IndexSet<String>,
    /// Most recent intelligence report
    pub latest_report: Option<IntelligenceReport>,
    /// Content queue pipeline stats
    pub queue: QueueStats,
}

/// Compute the aggregate snapshot for a full record set
///
/// Pure and infallible: empty tables produce zero counts, empty maps and
/// [`Average::NoData`].
#[must_use]
pub fn compute_analytics(tables: &TableSet) -> AggregateSnapshot {
    let pins = tables.get(TableKind::CompetitorPins);
    let analyses = tables.get(TableKind::PinAnalysis);

    let hook_distribution = tally(analyses.iter().map(|r| {
        r.logical_text(LogicalField::HookTechnique)
            .unwrap_or_else(|| UNKNOWN_HOOK.to_string())
    }));
    let top_hook = first_max(&hook_distribution).map(str::to_string);

    let mut pillar_distribution = PillarDistribution::new();
    for record in analyses {
        let pillar = record.logical_text(LogicalField::ContentPillar);
        pillar_distribution.increment(Pillar::classify(pillar.as_deref()));
    }

    let snapshot = AggregateSnapshot {
        total_pins: pins.len(),
        analyzed_pins: analyses.len(),
        top_hook,
        hook_distribution,
        keyword_frequency: tally(analyses.iter().flat_map(keywords)),
        pillar_distribution,
        avg_cta_strength: Average::of(
            analyses
                .iter()
                .filter_map(|r| r.logical(LogicalField::CtaStrength).and_then(numeric)),
        ),
        gap_opportunities: analyses
            .iter()
            .filter_map(|r| r.logical_text(LogicalField::GapOpportunity))
            .collect(),
        competitors: pins
            .iter()
            .filter_map(|r| r.logical_text(LogicalField::CompetitorName))
            .collect(),
        latest_report: latest_report(tables.get(TableKind::CompetitorIntelligence)),
        queue: QueueStats::compute(tables.get(TableKind::ContentQueue)),
    };

    tracing::debug!(
        "Computed analytics: {} pins, {} analyzed, {} keywords",
        snapshot.total_pins,
        snapshot.analyzed_pins,
        snapshot.keyword_frequency.len()
    );
    snapshot
}

/// Normalized keyword tokens of one analysis record
fn keywords(record: &Record) -> Vec<String> {
    let primary = record
        .logical_text(LogicalField::PrimaryKeywords)
        .unwrap_or_default();
    let secondary = record
        .logical_text(LogicalField::SecondaryKeywords)
        .unwrap_or_default();
    format!("{primary},{secondary}")
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

impl AggregateSnapshot {
    /// Number of distinct competitors
    #[inline]
    #[must_use]
    pub fn unique_competitors(&self) -> usize {
        self.competitors.len()
    }

    /// Share of analyzed pins using the top hook, e.g. `"67% of pins"`
    #[must_use]
    pub fn hook_share_label(&self) -> String {
        match &self.top_hook {
            Some(hook) if self.analyzed_pins > 0 => {
                let count = self.hook_distribution.get(hook).copied().unwrap_or(0);
                format!("{}% of pins", percent(count, self.analyzed_pins))
            }
            _ => "No data".to_string(),
        }
    }

    /// Hooks by count descending, shares over analyzed pins
    #[must_use]
    pub fn ranked_hooks(&self) -> Vec<Ranked> {
        rank(&self.hook_distribution, self.analyzed_pins)
    }

    /// Hooks whose share of analyzed pins is below five percent
    #[must_use]
    pub fn underutilized_hooks(&self) -> Vec<Ranked> {
        self.ranked_hooks()
            .into_iter()
            .filter(|r| r.share < UNDERUSED_SHARE)
            .collect()
    }

    /// Keywords by count descending, shares over all keyword mentions
    #[must_use]
    pub fn ranked_keywords(&self) -> Vec<Ranked> {
        let mentions = self.keyword_frequency.values().sum();
        rank(&self.keyword_frequency, mentions)
    }

    /// The `n` most frequent keywords
    #[must_use]
    pub fn top_keywords(&self, n: usize) -> Vec<Ranked> {
        let mut ranked = self.ranked_keywords();
        ranked.truncate(n);
        ranked
    }

    /// Gap notes grouped by lowercase trimmed text, by count descending
    #[must_use]
    pub fn ranked_gaps(&self) -> Vec<Ranked> {
        let grouped = tally(
            self.gap_opportunities
                .iter()
                .map(|gap| gap.trim().to_lowercase()),
        );
        rank(&grouped, self.gap_opportunities.len())
    }

    /// The `n` most frequent gap notes
    #[must_use]
    pub fn top_gaps(&self, n: usize) -> Vec<Ranked> {
        let mut ranked = self.ranked_gaps();
        ranked.truncate(n);
        ranked
    }

    /// Whole-number share of analyzed pins per pillar
    #[must_use]
    pub fn pillar_percentages(&self) -> Vec<(Pillar, f64)> {
        self.pillar_distribution.percentages(self.analyzed_pins)
    }

    /// Headline insight for the current data
    #[must_use]
    pub fn insight(&self) -> Option<Insight> {
        insight::classify(self)
    }
}
