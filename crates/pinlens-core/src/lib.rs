//! pinlens Core
//!
//! Record store interface, configuration and the dashboard controller that
//! ties the schema registry, the aggregation engine and the table view engine
//! to a refreshable snapshot.
//!
//! # Core Concepts
//!
//! - [`RecordStore`]: Whole-table fetch plus record write-back
//! - [`PagedStore`]: Cursor draining with bounded rate-limit retry
//! - [`MemoryStore`]: In-process paged backend for tests and snapshot files
//! - [`DashboardConfig`]: TOML configuration with builder setters
//! - [`Dashboard`]: Owns the snapshot, the view states and the sync status
//!
//! # Example
//!
//! ```rust
//! use pinlens_core::{Dashboard, DashboardConfig, MemoryStore, PagedStore, RetryPolicy};
//! use pinlens_schema::{Record, TableKind};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let source = MemoryStore::new()
//!     .with_table("Competitor Pins", vec![Record::from_json("rec1", json!({"Pin Title": "Budget hacks"}))])
//!     .with_table("Pin Analysis", vec![])
//!     .with_table("competitor_intelligence", vec![])
//!     .with_table("content_queue", vec![]);
//! let store = PagedStore::new(source, RetryPolicy::default());
//!
//! let mut dashboard = Dashboard::new(DashboardConfig::default());
//! dashboard.refresh(&store).await.unwrap();
//!
//! assert_eq!(dashboard.analytics().unwrap().total_pins, 1);
//! assert_eq!(dashboard.render(TableKind::CompetitorPins).count_label, "1 pins");
//! # });
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod dashboard;
mod error;
mod store;

// Re-exports
pub use config::{
    BearerToken, DashboardConfig, RetryPolicy, TableNames, DEFAULT_BASE_ID,
    DEFAULT_CREDENTIAL_KEY,
};
pub use dashboard::{Dashboard, Snapshot, SyncStatus};
pub use error::{ConfigError, DashboardError, StoreError};
pub use store::{MemoryStore, Page, PageSource, PagedStore, RecordStore, RecordWriter, MEMORY_PAGE_SIZE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
