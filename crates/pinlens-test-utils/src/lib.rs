//! Testing utilities for pinlens workspace
//!
//! Shared record fixtures and table builders.

#![allow(missing_docs)]

use pinlens_schema::{Record, TableKind, TableSet};
use serde_json::{json, Value};

pub fn record(id: &str, fields: Value) -> Record {
    Record::from_json(id, fields)
}

pub fn records(rows: Vec<Value>) -> Vec<Record> {
    rows.into_iter()
        .enumerate()
        .map(|(i, fields)| Record::from_json(format!("rec{i:04}"), fields))
        .collect()
}

pub fn analysis(hook: &str, pillar: &str, cta: Value) -> Value {
    json!({
        "Hook Technique": hook,
        "Content Pillar": pillar,
        "CTA Strength": cta,
    })
}

/// `n` competitor pins with distinct titles, saves and collection dates
pub fn numbered_pins(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            record(
                &format!("pin{i:04}"),
                json!({
                    "Pin Title": format!("Pin {i:04}"),
                    "Competitor Name": format!("Brand {}", i % 3),
                    "Saves": i * 10,
                    "Date Collected": format!("2024-01-{:02}", (i % 28) + 1),
                }),
            )
        })
        .collect()
}

pub fn sample_pin_analysis() -> Vec<Record> {
    vec![
        record(
            "anl1",
            json!({
                "Pin": ["pin0001"],
                "Hook Technique": "Curiosity",
                "Content Pillar": "Educational",
                "Primary Keywords": "budget, Save Money",
                "Secondary Keywords": "frugal",
                "CTA Strength": 8,
                "Gap Opportunity": "Weak CTA",
            }),
        ),
        record(
            "anl2",
            json!({
                "Pin": ["pin0002"],
                "Hook Technique": "List",
                "Content Pillar": "Proof",
                "Primary Keywords": "Budget",
                "CTA Strength": "bad",
                "Gap Opportunity": "weak cta ",
            }),
        ),
        record(
            "anl3",
            json!({
                "Pin": ["pin0003"],
                "hook_technique": "Curiosity",
                "content_pillar": "Lifestyle",
                "secondary_keywords": "meal prep",
                "cta_strength": "4",
                "gap_opportunity": "No proof",
            }),
        ),
    ]
}

pub fn sample_competitor_pins() -> Vec<Record> {
    vec![
        record(
            "pin0001",
            json!({
                "Pin Title": "10 Budget Hacks",
                "Competitor Name": "Frugal Co",
                "Pin URL": "https://example.com/pins/budget-hacks-for-families-2024",
                "Saves": 1520,
                "Status": "Active",
                "Analyzed": true,
            }),
        ),
        record(
            "pin0002",
            json!({
                "Pin Title": "Meal Prep Sunday",
                "Competitor Name": "Kitchen Kit",
                "Saves": 87,
                "Status": "Paused",
            }),
        ),
        record(
            "pin0003",
            json!({
                "Pin Title": "Why you are broke",
                "competitor_name": "Frugal Co",
                "Date Collected": "2024-02-10",
            }),
        ),
    ]
}

pub fn sample_intelligence() -> Vec<Record> {
    vec![
        record(
            "rep1",
            json!({"Report Date": "2024-01-07", "Week Summary": "Lists dominate."}),
        ),
        record(
            "rep2",
            json!({
                "Report Date": "2024-01-14",
                "Executive Summary": "Curiosity rising.",
                "Top Hooks": "Curiosity, List",
            }),
        ),
        record("rep3", json!({"Week Summary": "Undated report."})),
    ]
}

pub fn sample_content_queue() -> Vec<Record> {
    vec![
        record("cq1", json!({"Content_ID": "CQ-001", "Status": "Posted", "Metrics_Engagement": 4.2})),
        record("cq2", json!({"Content_ID": "CQ-002", "Status": "Posted", "Metrics_Engagement": "5"})),
        record("cq3", json!({"Content_ID": "CQ-003", "Status": "Posted"})),
        record("cq4", json!({"Content_ID": "CQ-004", "Status": "Queued"})),
        record("cq5", json!({"Content_ID": "CQ-005"})),
    ]
}

pub fn sample_tables() -> TableSet {
    TableSet::new()
        .with_table(TableKind::CompetitorPins, sample_competitor_pins())
        .with_table(TableKind::PinAnalysis, sample_pin_analysis())
        .with_table(TableKind::CompetitorIntelligence, sample_intelligence())
        .with_table(TableKind::ContentQueue, sample_content_queue())
}

pub fn analysis_only(rows: Vec<Value>) -> TableSet {
    TableSet::new().with_table(TableKind::PinAnalysis, records(rows))
}
