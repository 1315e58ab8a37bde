//! Rendered pages, headers, pagination and empty states

use crate::cell::{render_cell, CellContent, RenderedCell};
use crate::format::format_count;
use crate::pipeline::{apply, PageWindow};
use crate::state::{SortDirection, ViewState};
use indexmap::IndexMap;
use pinlens_schema::{escape_html, Record, TableKind, TableSchema};
use serde::Serialize;

/// Page-number buttons shown at once
pub const PAGE_BUTTONS: usize = 7;

/// Column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    /// Column key (the sort target)
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Pinned while scrolling
    pub sticky: bool,
    /// Active sort direction on this column
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    /// Escaped label plus sort indicator
    #[must_use]
    pub fn to_html(&self) -> String {
        match self.sort {
            Some(direction) => format!(
                r#"{} <span class="sort-indicator">{}</span>"#,
                escape_html(self.label),
                direction.glyph()
            ),
            None => escape_html(self.label),
        }
    }
}

/// One rendered body row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// Source record
    pub record_id: String,
    /// Cells in schema column order
    pub cells: Vec<RenderedCell>,
}

/// Pagination descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page after clamping
    pub page: usize,
    /// Total pages, at least 1
    pub total_pages: usize,
    /// First shown row, 1-based (0 when empty)
    pub from: usize,
    /// Last shown row, 1-based
    pub to: usize,
    /// Filtered row count
    pub total: usize,
    /// Page-number buttons around the current page
    pub buttons: Vec<usize>,
    /// Previous-page control enabled
    pub has_prev: bool,
    /// Next-page control enabled
    pub has_next: bool,
}

impl Pagination {
    /// Describe a clamped window
    #[must_use]
    pub fn from_window(window: &PageWindow) -> Self {
        let from = if window.is_empty() { 0 } else { window.start + 1 };
        Self {
            page: window.page,
            total_pages: window.total_pages,
            from,
            to: window.end,
            total: window.total,
            buttons: page_buttons(window.page, window.total_pages),
            has_prev: window.page > 1,
            has_next: window.page < window.total_pages,
        }
    }

    /// `"Showing X–Y of Z"`, or `"Showing 0 of 0"`
    #[must_use]
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "Showing 0 of 0".to_string();
        }
        format!(
            "Showing {}–{} of {}",
            format_count(self.from),
            format_count(self.to),
            format_count(self.total)
        )
    }
}

/// Window of at most [`PAGE_BUTTONS`] page numbers centered on `page`
#[must_use]
pub fn page_buttons(page: usize, total_pages: usize) -> Vec<usize> {
    let half = PAGE_BUTTONS / 2;
    let mut start = page.saturating_sub(half).max(1);
    let end = (start + PAGE_BUTTONS - 1).min(total_pages);
    start = end.saturating_sub(PAGE_BUTTONS - 1).max(1);
    (start..=end).collect()
}

/// Why a table shows no rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyState {
    /// The table has no records at all
    NoData,
    /// Records exist but the search or facets exclude all of them
    NoResults {
        /// Count unit of the table
        unit: &'static str,
    },
}

impl EmptyState {
    /// Headline
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::NoData => "No records yet".to_string(),
            Self::NoResults { unit } => format!("No {unit} match your filters"),
        }
    }

    /// Supporting line
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::NoData => "Records will appear here after the next sync.",
            Self::NoResults { .. } => "Try a different search or clear the filters.",
        }
    }

    /// Whether a "clear filters" action applies
    #[inline]
    #[must_use]
    pub fn offers_clear_filters(&self) -> bool {
        matches!(self, Self::NoResults { .. })
    }
}

/// Everything the presentation layer needs for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    /// Table rendered
    pub table: TableKind,
    /// Column headers
    pub headers: Vec<HeaderCell>,
    /// Rows of the current page
    pub rows: Vec<RenderedRow>,
    /// Pagination descriptor
    pub pagination: Pagination,
    /// `"<n> <unit>"` or `"<n> of <total> <unit>"`
    pub count_label: String,
    /// Set when there are no rows to show
    pub empty_state: Option<EmptyState>,
    /// Full text of truncated cells by reference id
    pub expandable: IndexMap<String, String>,
}

impl RenderedPage {
    /// Full text behind an expandable cell
    #[must_use]
    pub fn full_text(&self, reference: &str) -> Option<&str> {
        self.expandable.get(reference).map(String::as_str)
    }

    /// Pagination range label
    #[must_use]
    pub fn range_label(&self) -> String {
        self.pagination.range_label()
    }
}

/// Render the current page of a table
///
/// Pure: the same records and state always give the same page. The
/// requested page is clamped, never rejected.
#[must_use]
pub fn render(schema: &'static TableSchema, records: &[Record], state: &ViewState) -> RenderedPage {
    let pipeline = apply(records, schema, state);
    let kind = schema.kind();

    let headers = schema
        .columns()
        .iter()
        .map(|column| HeaderCell {
            key: column.key,
            label: column.label,
            sticky: column.sticky,
            sort: state
                .sort()
                .filter(|spec| spec.column == column.key)
                .map(|spec| spec.direction),
        })
        .collect();

    let mut expandable = IndexMap::new();
    let rows = pipeline
        .page_rows()
        .iter()
        .map(|record| {
            let cells: Vec<_> = schema
                .columns()
                .iter()
                .map(|column| render_cell(kind, column, record))
                .collect();
            for cell in &cells {
                if let (Some(full), CellContent::Text { expand_ref: Some(id), .. }) =
                    (&cell.full_text, &cell.content)
                {
                    expandable.insert(id.clone(), full.clone());
                }
            }
            RenderedRow {
                record_id: record.id.clone(),
                cells,
            }
        })
        .collect();

    let filtered = pipeline.rows.len();
    let count_label = if state.is_filtered() {
        format!(
            "{} of {} {}",
            format_count(filtered),
            format_count(records.len()),
            schema.unit()
        )
    } else {
        format!("{} {}", format_count(filtered), schema.unit())
    };

    let empty_state = if records.is_empty() {
        Some(EmptyState::NoData)
    } else if filtered == 0 {
        Some(EmptyState::NoResults {
            unit: schema.unit(),
        })
    } else {
        None
    };

    tracing::trace!(
        "Rendered {} page {}/{} ({} rows)",
        kind,
        pipeline.window.page,
        pipeline.window.total_pages,
        pipeline.window.len()
    );

    RenderedPage {
        table: kind,
        headers,
        rows,
        pagination: Pagination::from_window(&pipeline.window),
        count_label,
        empty_state,
        expandable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlens_schema::describe;
    use pinlens_test_utils::{numbered_pins, sample_competitor_pins};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pins() -> &'static TableSchema {
        describe(TableKind::CompetitorPins)
    }

    #[test]
    fn buttons_center_and_clamp() {
        assert_eq!(page_buttons(1, 3), vec![1, 2, 3]);
        assert_eq!(page_buttons(1, 20), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(page_buttons(10, 20), vec![7, 8, 9, 10, 11, 12, 13]);
        assert_eq!(page_buttons(20, 20), vec![14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(page_buttons(1, 1), vec![1]);
    }

    #[test]
    fn headers_mark_sorted_column() {
        let mut state = ViewState::default();
        state.set_sort(pins(), "Saves").unwrap();
        state.set_sort(pins(), "Saves").unwrap();

        let page = render(pins(), &sample_competitor_pins(), &state);
        let saves = page.headers.iter().find(|h| h.key == "Saves").unwrap();
        assert_eq!(saves.sort, Some(SortDirection::Desc));
        assert_eq!(saves.to_html(), r#"Saves <span class="sort-indicator">▼</span>"#);
        assert!(page.headers[0].sticky);
        assert!(page.headers.iter().filter(|h| h.sort.is_some()).count() == 1);
    }

    #[test]
    fn second_page_of_twenty_five() {
        let mut state = ViewState::default();
        state.set_page(2);
        let page = render(pins(), &numbered_pins(25), &state);

        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
        assert_eq!(page.range_label(), "Showing 21–25 of 25");
        assert_eq!(page.count_label, "25 pins");
    }

    #[test]
    fn count_label_when_filtered() {
        let mut state = ViewState::default();
        state.set_search("frugal");
        let page = render(pins(), &sample_competitor_pins(), &state);
        assert_eq!(page.count_label, "1 of 3 pins");
    }

    #[test]
    fn empty_states_differ() {
        let state = ViewState::default();
        let page = render(pins(), &[], &state);
        assert_eq!(page.empty_state, Some(EmptyState::NoData));
        assert_eq!(page.range_label(), "Showing 0 of 0");
        assert!(!page.empty_state.unwrap().offers_clear_filters());

        let mut state = ViewState::default();
        state.set_search("zzz");
        let page = render(pins(), &sample_competitor_pins(), &state);
        let empty = page.empty_state.unwrap();
        assert_eq!(empty, EmptyState::NoResults { unit: "pins" });
        assert_eq!(empty.title(), "No pins match your filters");
        assert!(empty.offers_clear_filters());
    }

    #[test]
    fn expandable_text_collected() {
        let long = "word ".repeat(30);
        let data = vec![Record::from_json(
            "pinX",
            json!({"Pin Title": "T", "Pin Description": long}),
        )];
        let page = render(pins(), &data, &ViewState::default());
        let reference = "competitor-pins:pinX:Pin Description";
        assert_eq!(page.full_text(reference), Some(long.as_str()));
        assert_eq!(page.expandable.len(), 1);
    }

    #[test]
    fn render_is_idempotent() {
        let data = sample_competitor_pins();
        let mut state = ViewState::default();
        state.set_sort(pins(), "Pin Title").unwrap();
        assert_eq!(render(pins(), &data, &state), render(pins(), &data, &state));
    }
}
