//! pinlens Table View Engine
//!
//! Turns `(schema, records, view state)` into a rendered page. The pipeline
//! is pure and synchronous: facets, search, stable type-aware sort, then a
//! clamped page slice rendered cell by cell.
//!
//! # Core Concepts
//!
//! - [`ViewState`]: Page, page size, search, sort and facets for one table
//! - [`pipeline`]: Filter, sort and paginate stages
//! - [`CellContent`]: Typed cell content with an explicit HTML escape step
//! - [`RenderedPage`]: Headers, rows, pagination and empty state
//! - [`format`]: Number, date and compact display helpers
//!
//! # Example
//!
//! ```rust
//! use pinlens_schema::{describe, Record, TableKind};
//! use pinlens_view::{render, ViewState};
//! use serde_json::json;
//!
//! let schema = describe(TableKind::CompetitorPins);
//! let records = vec![
//!     Record::from_json("a", json!({"Pin Title": "Budget hacks", "Saves": 1520})),
//!     Record::from_json("b", json!({"Pin Title": "Meal prep", "Saves": 87})),
//! ];
//!
//! let mut state = ViewState::default();
//! state.set_sort(schema, "Saves").unwrap();
//!
//! let page = render(schema, &records, &state);
//! assert_eq!(page.rows[0].record_id, "b");
//! assert_eq!(page.count_label, "2 pins");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cell;
mod error;
pub mod format;
mod page;
pub mod pipeline;
mod state;

// Re-exports
pub use cell::{
    expand_ref, is_safe_href, render_cell, CellContent, RenderedCell, StatusTone, ATTACHMENT_ICON,
    CHECK_FALSE, CHECK_TRUE, LINKED_LIMIT, LINK_SCHEMES, TEXT_LIMIT, URL_LIMIT,
};
pub use error::ViewError;
pub use page::{
    page_buttons, render, EmptyState, HeaderCell, Pagination, RenderedPage, RenderedRow,
    PAGE_BUTTONS,
};
pub use pipeline::PageWindow;
pub use state::{SortDirection, SortSpec, ViewState, DEFAULT_PAGE_SIZE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if transitions panic on rejection
pub const fn strict_debug() -> bool {
    cfg!(feature = "strict-debug")
}
