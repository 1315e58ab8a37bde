//! Field alias table
//!
//! Some fields reach us under more than one raw key (display casing and
//! snake_case). A [`LogicalField`] names the field once and lists the raw
//! keys in lookup order; the first present key wins.

use crate::record::Record;
use serde_json::Value;

/// Logical field read by aggregate computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    /// Hook technique category
    HookTechnique,
    /// Primary keyword list (comma separated)
    PrimaryKeywords,
    /// Secondary keyword list (comma separated)
    SecondaryKeywords,
    /// Content pillar bucket
    ContentPillar,
    /// CTA strength score
    CtaStrength,
    /// Free-text gap note
    GapOpportunity,
    /// Competitor display name
    CompetitorName,
    /// Intelligence report date
    ReportDate,
    /// Intelligence report summary
    ReportSummary,
    /// Intelligence report hook notes
    TopHooks,
    /// Intelligence report keyword notes
    TopKeywords,
    /// Intelligence report recommendations
    StrategyRecommendations,
    /// Content queue pipeline status
    QueueStatus,
    /// Content queue engagement metric
    Engagement,
}

impl LogicalField {
    /// Raw keys in lookup order
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::HookTechnique => &["Hook Technique", "hook_technique"],
            LogicalField::PrimaryKeywords => &["Primary Keywords", "primary_keywords"],
            LogicalField::SecondaryKeywords => &["Secondary Keywords", "secondary_keywords"],
            LogicalField::ContentPillar => &["Content Pillar", "content_pillar"],
            LogicalField::CtaStrength => &["CTA Strength", "cta_strength"],
            LogicalField::GapOpportunity => &["Gap Opportunity", "gap_opportunity"],
            LogicalField::CompetitorName => &["Competitor Name", "competitor_name"],
            LogicalField::ReportDate => &["Report Date", "report_date"],
            LogicalField::ReportSummary => &["Week Summary", "week_summary", "Executive Summary"],
            LogicalField::TopHooks => &["Top Hooks"],
            LogicalField::TopKeywords => &["Top Keywords"],
            LogicalField::StrategyRecommendations => &["Strategy Recommendations"],
            LogicalField::QueueStatus => &["Status"],
            LogicalField::Engagement => &["Metrics_Engagement"],
        }
    }

    /// First present value among the aliases
    ///
    /// Null and the empty string count as absent; `0`, `false` and arrays
    /// are present.
    #[must_use]
    pub fn resolve(self, record: &Record) -> Option<&Value> {
        self.aliases()
            .iter()
            .filter_map(|key| record.get(key))
            .find(|v| is_present(v))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
