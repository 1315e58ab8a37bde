//! Weekly intelligence report selection

use chrono::{DateTime, Utc};
use pinlens_schema::value::{parse_timestamp, timestamp_millis_or_zero};
use pinlens_schema::{LogicalField, Record};
use serde::Serialize;

/// Summary text when a report has none
pub const NO_SUMMARY: &str = "No summary available.";

/// Most recent intelligence report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelligenceReport {
    /// Source record
    pub record_id: String,
    /// Report date, when parseable
    pub report_date: Option<DateTime<Utc>>,
    /// Week or executive summary
    pub summary: String,
    /// Hook notes
    pub top_hooks: Option<String>,
    /// Keyword notes
    pub top_keywords: Option<String>,
    /// Strategy recommendations
    pub recommendations: Option<String>,
}

impl IntelligenceReport {
    fn from_record(record: &Record) -> Self {
        Self {
            record_id: record.id.clone(),
            report_date: record.logical(LogicalField::ReportDate).and_then(parse_timestamp),
            summary: record
                .logical_text(LogicalField::ReportSummary)
                .unwrap_or_else(|| NO_SUMMARY.to_string()),
            top_hooks: record.logical_text(LogicalField::TopHooks),
            top_keywords: record.logical_text(LogicalField::TopKeywords),
            recommendations: record.logical_text(LogicalField::StrategyRecommendations),
        }
    }
}

/// Report with the latest date; unparseable dates count as epoch 0 and the
/// earliest record wins ties
#[must_use]
pub fn latest_report(reports: &[Record]) -> Option<IntelligenceReport> {
    let mut latest: Option<(&Record, i64)> = None;
    for record in reports {
        let millis = timestamp_millis_or_zero(record.logical(LogicalField::ReportDate));
        if latest.map_or(true, |(_, best)| millis > best) {
            latest = Some((record, millis));
        }
    }
    latest.map(|(record, _)| IntelligenceReport::from_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlens_test_utils::{record, sample_intelligence};
    use serde_json::json;

    #[test]
    fn picks_latest_date() {
        let report = latest_report(&sample_intelligence()).unwrap();
        assert_eq!(report.record_id, "rep2");
        assert_eq!(report.summary, "Curiosity rising.");
        assert_eq!(report.top_hooks.as_deref(), Some("Curiosity, List"));
        assert!(report.recommendations.is_none());
    }

    #[test]
    fn empty_table_has_no_report() {
        assert!(latest_report(&[]).is_none());
    }

    #[test]
    fn undated_reports_keep_first() {
        let reports = vec![
            record("a", json!({"Week Summary": "first"})),
            record("b", json!({"Week Summary": "second"})),
        ];
        let report = latest_report(&reports).unwrap();
        assert_eq!(report.record_id, "a");
        assert!(report.report_date.is_none());
    }

    #[test]
    fn missing_summary_placeholder() {
        let reports = vec![record("a", json!({"report_date": "2024-03-01"}))];
        let report = latest_report(&reports).unwrap();
        assert_eq!(report.summary, NO_SUMMARY);
        assert!(report.report_date.is_some());
    }
}
