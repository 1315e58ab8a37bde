//! Content queue pipeline stats

use crate::average::Average;
use indexmap::IndexMap;
use pinlens_schema::value::numeric;
use pinlens_schema::{LogicalField, Record};
use serde::Serialize;
use serde_json::Value;

/// Pipeline statuses, in tab order
pub const QUEUE_STATUSES: [&str; 6] = ["Queued", "Generating", "Ready", "Posted", "Archived", "Failed"];

/// Status counts and engagement for the content queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStats {
    /// All queue items
    pub total: usize,
    /// Count per known status
    pub by_status: IndexMap<&'static str, usize>,
    /// Mean engagement over posted items with metrics
    pub avg_engagement: Average,
    /// Posted items that carried an engagement metric
    pub posted_with_metrics: usize,
}

impl QueueStats {
    /// Compute from queue records
    #[must_use]
    pub fn compute(records: &[Record]) -> Self {
        let mut by_status: IndexMap<&'static str, usize> =
            QUEUE_STATUSES.iter().map(|s| (*s, 0)).collect();
        let mut engagement = Vec::new();

        for record in records {
            let status = record.logical_text(LogicalField::QueueStatus);
            let Some(status) = status.as_deref() else {
                continue;
            };
            if let Some(count) = by_status.get_mut(status) {
                *count += 1;
            }
            if status == "Posted" {
                if let Some(v) = engagement_metric(record) {
                    engagement.push(numeric(v).unwrap_or(0.0));
                }
            }
        }

        Self {
            total: records.len(),
            by_status,
            posted_with_metrics: engagement.len(),
            avg_engagement: Average::of(engagement),
        }
    }

    /// Count for one status; unknown statuses count zero
    #[inline]
    #[must_use]
    pub fn count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

/// Any non-null engagement value, the empty string included
fn engagement_metric(record: &Record) -> Option<&Value> {
    LogicalField::Engagement
        .aliases()
        .iter()
        .filter_map(|key| record.get(key))
        .find(|v| !v.is_null())
}

impl Default for QueueStats {
    fn default() -> Self {
        Self::compute(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlens_test_utils::{record, sample_content_queue};
    use serde_json::json;

    #[test]
    fn counts_by_status() {
        let stats = QueueStats::compute(&sample_content_queue());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.count("Posted"), 3);
        assert_eq!(stats.count("Queued"), 1);
        assert_eq!(stats.count("Failed"), 0);
        assert_eq!(stats.count("Unknown"), 0);
    }

    #[test]
    fn engagement_over_posted_with_metrics() {
        let stats = QueueStats::compute(&sample_content_queue());
        assert_eq!(stats.posted_with_metrics, 2);
        assert_eq!(stats.avg_engagement, Average::Value(4.6));
    }

    #[test]
    fn non_numeric_engagement_counts_zero() {
        let records = vec![
            record("a", json!({"Status": "Posted", "Metrics_Engagement": "n/a"})),
            record("b", json!({"Status": "Posted", "Metrics_Engagement": 6})),
        ];
        let stats = QueueStats::compute(&records);
        assert_eq!(stats.avg_engagement, Average::Value(3.0));
    }

    #[test]
    fn blank_engagement_counts_as_zero_metric() {
        let records = vec![
            record("a", json!({"Status": "Posted", "Metrics_Engagement": ""})),
            record("b", json!({"Status": "Posted", "Metrics_Engagement": 8})),
            record("c", json!({"Status": "Posted", "Metrics_Engagement": null})),
            record("d", json!({"Status": "Posted"})),
        ];
        let stats = QueueStats::compute(&records);
        assert_eq!(stats.posted_with_metrics, 2);
        assert_eq!(stats.avg_engagement, Average::Value(4.0));
    }

    #[test]
    fn empty_queue() {
        let stats = QueueStats::default();
        assert_eq!(stats.total, 0);
        assert!(stats.avg_engagement.is_no_data());
        assert_eq!(stats.by_status.len(), QUEUE_STATUSES.len());
    }
}
