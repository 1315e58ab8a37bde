//! pinlens Aggregation Engine
//!
//! Derived statistics over the mirrored tables. Everything here is a pure
//! function of a [`TableSet`](pinlens_schema::TableSet) and never fails;
//! missing or malformed values degrade to zero counts, empty maps and the
//! [`Average::NoData`] sentinel.
//!
//! # Core Concepts
//!
//! - [`AggregateSnapshot`]: Counts, distributions and averages, recomputed per refresh
//! - [`PillarDistribution`]: Five fixed content pillar buckets
//! - [`Ranked`]: Stable frequency rankings (hooks, keywords, gaps)
//! - [`IntelligenceReport`]: Latest weekly competitor report
//! - [`QueueStats`]: Content queue pipeline counts
//! - [`Insight`]: Which observation the dashboard leads with
//!
//! # Example
//!
//! ```rust
//! use pinlens_analytics::{compute_analytics, Average};
//! use pinlens_schema::{Record, TableKind, TableSet};
//! use serde_json::json;
//!
//! let tables = TableSet::new().with_table(
//!     TableKind::PinAnalysis,
//!     vec![
//!         Record::from_json("a", json!({"Hook Technique": "Curiosity", "CTA Strength": 8})),
//!         Record::from_json("b", json!({"Hook Technique": "List", "CTA Strength": "bad"})),
//!     ],
//! );
//!
//! let snapshot = compute_analytics(&tables);
//! assert_eq!(snapshot.top_hook.as_deref(), Some("Curiosity"));
//! assert_eq!(snapshot.avg_cta_strength, Average::Value(8.0));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod average;
mod insight;
mod intelligence;
mod pillar;
mod queue;
mod ranking;
mod snapshot;

// Re-exports
pub use average::{percent, Average};
pub use insight::{classify as classify_insight, Insight, UNDERUSED_SHARE, WEAK_CTA_THRESHOLD};
pub use intelligence::{latest_report, IntelligenceReport, NO_SUMMARY};
pub use pillar::{Pillar, PillarDistribution};
pub use queue::{QueueStats, QUEUE_STATUSES};
pub use ranking::{first_max, rank, tally, Ranked};
pub use snapshot::{compute_analytics, AggregateSnapshot, UNKNOWN_HOOK};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
