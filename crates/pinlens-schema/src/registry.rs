//! Schema registry
//!
//! [`describe`] is a total function over [`TableKind`]: every mirrored table
//! has exactly one static schema, and there is no way to name a table that
//! has none.

use crate::column::{ColumnDescriptor, ColumnType};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mirrored table kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    /// Scraped competitor pins (primary table)
    CompetitorPins,
    /// Per-pin analysis (secondary table)
    PinAnalysis,
    /// Weekly intelligence reports
    CompetitorIntelligence,
    /// Own content pipeline
    ContentQueue,
}

impl TableKind {
    /// Every table kind, in load order
    pub const ALL: [TableKind; 4] = [
        TableKind::CompetitorPins,
        TableKind::PinAnalysis,
        TableKind::CompetitorIntelligence,
        TableKind::ContentQueue,
    ];

    /// URL-safe identifier
    #[inline]
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            TableKind::CompetitorPins => "competitor-pins",
            TableKind::PinAnalysis => "pin-analysis",
            TableKind::CompetitorIntelligence => "competitor-intelligence",
            TableKind::ContentQueue => "content-queue",
        }
    }

    /// Schema for this table
    #[inline]
    #[must_use]
    pub fn schema(self) -> &'static TableSchema {
        describe(self)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TableKind {
    type Err = SchemaError;

    /// Accepts the slug, the snake_case slug or the default remote table name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TableKind::ALL
            .into_iter()
            .find(|kind| {
                kind.slug() == wanted
                    || kind.slug().replace('-', "_") == wanted
                    || kind.schema().remote_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| SchemaError::UnknownTable(s.to_string()))
    }
}

/// Static description of one table
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    kind: TableKind,
    remote_name: &'static str,
    unit: &'static str,
    columns: &'static [ColumnDescriptor],
}

impl TableSchema {
    /// Table kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Default table name in the remote store
    #[inline]
    #[must_use]
    pub fn remote_name(&self) -> &'static str {
        self.remote_name
    }

    /// Count unit, e.g. "pins"
    #[inline]
    #[must_use]
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Columns in display order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &'static [ColumnDescriptor] {
        self.columns
    }

    /// Look up a column by key
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&'static ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Look up a column, failing on unknown keys
    ///
    /// # Errors
    /// [`SchemaError::UnknownColumn`] when the schema has no such key.
    pub fn require_column(&self, key: &str) -> Result<&'static ColumnDescriptor, SchemaError> {
        self.column(key)
            .ok_or_else(|| SchemaError::unknown_column(self.kind.slug(), key))
    }

    /// Whether the schema declares this key
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    /// Pinned leading columns
    pub fn sticky_columns(&self) -> impl Iterator<Item = &'static ColumnDescriptor> {
        self.columns.iter().filter(|c| c.sticky)
    }
}

/// Schema for a table kind
#[must_use]
pub fn describe(kind: TableKind) -> &'static TableSchema {
    match kind {
        TableKind::CompetitorPins => &COMPETITOR_PINS,
        TableKind::PinAnalysis => &PIN_ANALYSIS,
        TableKind::CompetitorIntelligence => &COMPETITOR_INTELLIGENCE,
        TableKind::ContentQueue => &CONTENT_QUEUE,
    }
}

use ColumnType::{Attachment, Checkbox, Date, Linked, Number, Select, Text, Url};

const fn col(key: &'static str, label: &'static str, ty: ColumnType) -> ColumnDescriptor {
    ColumnDescriptor::new(key, label, ty)
}

static COMPETITOR_PINS: TableSchema = TableSchema {
    kind: TableKind::CompetitorPins,
    remote_name: "Competitor Pins",
    unit: "pins",
    columns: &[
        col("Pin Title", "Pin Title", Text).sticky(),
        col("Competitor Name", "Competitor", Text).sticky(),
        col("Pin URL", "Pin URL", Url),
        col("Image", "Image", Attachment),
        col("Pin Description", "Description", Text),
        col("Board Name", "Board", Text),
        col("Saves", "Saves", Number),
        col("Engagement Score", "Engagement", Number),
        col("Date Collected", "Collected", Date),
        col("Status", "Status", Select),
        col("Analyzed", "Analyzed", Checkbox),
        col("Pin Analysis", "Analysis", Linked),
    ],
};

static PIN_ANALYSIS: TableSchema = TableSchema {
    kind: TableKind::PinAnalysis,
    remote_name: "Pin Analysis",
    unit: "analyses",
    columns: &[
        col("Pin", "Pin", Linked).sticky(),
        col("Hook Technique", "Hook", Select),
        col("Content Pillar", "Pillar", Select),
        col("Primary Keywords", "Primary Keywords", Text),
        col("Secondary Keywords", "Secondary Keywords", Text),
        col("CTA Strength", "CTA Strength", Number),
        col("Emotional Trigger", "Emotional Trigger", Text),
        col("Gap Opportunity", "Gap Opportunity", Text),
        col("Analyzed At", "Analyzed", Date),
    ],
};

static COMPETITOR_INTELLIGENCE: TableSchema = TableSchema {
    kind: TableKind::CompetitorIntelligence,
    remote_name: "competitor_intelligence",
    unit: "reports",
    columns: &[
        col("Report Date", "Report Date", Date).sticky(),
        col("Week Summary", "Summary", Text),
        col("Top Hooks", "Top Hooks", Text),
        col("Top Keywords", "Top Keywords", Text),
        col("Strategy Recommendations", "Recommendations", Text),
        col("Pins Analyzed", "Pins Analyzed", Number),
    ],
};

static CONTENT_QUEUE: TableSchema = TableSchema {
    kind: TableKind::ContentQueue,
    remote_name: "content_queue",
    unit: "items",
    columns: &[
        col("Content_ID", "ID", Text).sticky(),
        col("Topic", "Topic", Text).sticky(),
        col("Status", "Status", Select),
        col("Content_Pillar", "Pillar", Select),
        col("Hook_Type", "Hook", Select),
        col("Platform", "Platform", Select),
        col("Target_Keywords", "Keywords", Text),
        col("Caption_Text", "Caption", Text),
        col("CTA_Text", "CTA", Text),
        col("Competitor_Inspired", "Competitor Inspired", Checkbox),
        col("Post_URL", "Post", Url),
        col("Metrics_Reach", "Reach", Number),
        col("Metrics_Saves", "Saves", Number),
        col("Metrics_Clicks", "Clicks", Number),
        col("Metrics_Engagement", "Engagement", Number),
        col("Performance_Tier", "Tier", Select),
        col("Created_Date", "Created", Date),
        col("Posted_Date", "Posted", Date),
    ],
};
