//! Filter, sort and paginate
//!
//! Each stage is a pure function of `(records, schema, state)`; [`apply`]
//! chains them in order: facets, search, sort, page slice.

use crate::state::{SortDirection, SortSpec, ViewState};
use pinlens_schema::value::{coerce_number, coerce_opt_string, timestamp_millis_or_zero};
use pinlens_schema::{ColumnType, Record, TableSchema};
use serde::Serialize;
use std::cmp::Ordering;

/// Clamped page position over a filtered row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Current page after clamping, 1-based
    pub page: usize,
    /// `max(1, ceil(total / page_size))`
    pub total_pages: usize,
    /// Rows per page
    pub page_size: usize,
    /// Slice start (inclusive)
    pub start: usize,
    /// Slice end (exclusive)
    pub end: usize,
    /// Filtered row count
    pub total: usize,
}

impl PageWindow {
    /// Clamp `page` into range and compute the slice bounds
    #[must_use]
    pub fn new(total: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let start = ((page - 1) * page_size).min(total);
        let end = (start + page_size).min(total);
        Self {
            page,
            total_pages,
            page_size,
            start,
            end,
            total,
        }
    }

    /// Rows on this page
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this page has no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Rows surviving facets and search, sorted, plus the clamped window
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    /// Filtered and sorted rows (all pages)
    pub rows: Vec<&'a Record>,
    /// Position of the requested page
    pub window: PageWindow,
}

impl<'a> Pipeline<'a> {
    /// Rows of the current page
    #[must_use]
    pub fn page_rows(&self) -> &[&'a Record] {
        &self.rows[self.window.start..self.window.end]
    }
}

/// Run the full pipeline
#[must_use]
pub fn apply<'a>(records: &'a [Record], schema: &TableSchema, state: &ViewState) -> Pipeline<'a> {
    let mut rows = filter(records, schema, state);
    if let Some(spec) = state.sort() {
        sort(&mut rows, schema, spec);
    }
    let window = PageWindow::new(rows.len(), state.page(), state.page_size());
    Pipeline { rows, window }
}

/// Keep records matching every facet and the search text
#[must_use]
pub fn filter<'a>(records: &'a [Record], schema: &TableSchema, state: &ViewState) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| matches_facets(r, state))
        .filter(|r| matches_search(r, schema, state.search()))
        .collect()
}

fn matches_facets(record: &Record, state: &ViewState) -> bool {
    state
        .facets()
        .iter()
        .all(|(column, value)| record.text(column) == *value)
}

/// Whether the record's searchable text contains `needle`
///
/// The haystack is every schema column's coerced value, space-joined and
/// lowercased. `needle` is expected already lowercased; empty matches all.
#[must_use]
pub fn matches_search(record: &Record, schema: &TableSchema, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack = schema
        .columns()
        .iter()
        .map(|c| coerce_opt_string(record.get(c.key)))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    haystack.contains(needle)
}

/// Stable sort by the spec's column; unknown columns leave the order
pub fn sort(rows: &mut [&Record], schema: &TableSchema, spec: &SortSpec) {
    let Some(column) = schema.column(&spec.column) else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = compare_values(column.column_type, a, b, column.key);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Ascending type-aware comparison of one column between two records
///
/// - number: [`coerce_number`], NaN after every number and equal to NaN
/// - date: epoch milliseconds, unparseable as 0
/// - everything else: case-sensitive comparison of the coerced string
#[must_use]
pub fn compare_values(column_type: ColumnType, a: &Record, b: &Record, key: &str) -> Ordering {
    match column_type {
        ColumnType::Number => {
            compare_numbers(coerce_number(a.get(key)), coerce_number(b.get(key)))
        }
        ColumnType::Date => {
            timestamp_millis_or_zero(a.get(key)).cmp(&timestamp_millis_or_zero(b.get(key)))
        }
        ColumnType::Text
        | ColumnType::Select
        | ColumnType::Checkbox
        | ColumnType::Url
        | ColumnType::Attachment
        | ColumnType::Linked => a.text(key).cmp(&b.text(key)),
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlens_schema::{describe, TableKind};
    use pinlens_test_utils::{numbered_pins, records, sample_competitor_pins};
    use serde_json::json;

    fn pins() -> &'static TableSchema {
        describe(TableKind::CompetitorPins)
    }

    fn ids(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn window_clamps_past_end() {
        let window = PageWindow::new(25, 9, 20);
        assert_eq!(window.page, 2);
        assert_eq!(window.total_pages, 2);
        assert_eq!((window.start, window.end), (20, 25));
    }

    #[test]
    fn window_for_empty_set() {
        let window = PageWindow::new(0, 3, 20);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert!(window.is_empty());
    }

    #[test]
    fn search_spans_all_columns() {
        let data = sample_competitor_pins();
        let mut state = ViewState::default();

        state.set_search("kitchen");
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0002"]);

        state.set_search("PAUSED");
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0002"]);

        state.set_search("");
        assert_eq!(filter(&data, pins(), &state).len(), 3);
    }

    #[test]
    fn search_ignores_undeclared_fields() {
        // competitor_name is an alias, not a schema column
        let data = sample_competitor_pins();
        let mut state = ViewState::default();
        state.set_search("broke");
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0003"]);
        state.set_search("frugal co");
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0001"]);
    }

    #[test]
    fn search_matches_numbers_as_text() {
        let data = sample_competitor_pins();
        let mut state = ViewState::default();
        state.set_search("1520");
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0001"]);
    }

    #[test]
    fn facets_match_exactly() {
        let data = sample_competitor_pins();
        let mut state = ViewState::default();
        state.set_facet(pins(), "Status", "Active").unwrap();
        assert_eq!(ids(&filter(&data, pins(), &state)), vec!["pin0001"]);

        state.set_facet(pins(), "Status", "active").unwrap();
        assert!(filter(&data, pins(), &state).is_empty());
    }

    #[test]
    fn numeric_sort_with_missing_and_text() {
        let data = records(vec![
            json!({"Saves": 30}),
            json!({"Saves": "n/a"}),
            json!({}),
            json!({"Saves": " 7 "}),
            json!({"Saves": -2}),
        ]);
        let mut rows: Vec<_> = data.iter().collect();
        let spec = SortSpec {
            column: "Saves".into(),
            direction: SortDirection::Asc,
        };
        sort(&mut rows, pins(), &spec);
        assert_eq!(ids(&rows), vec!["rec0004", "rec0002", "rec0003", "rec0000", "rec0001"]);
    }

    #[test]
    fn date_sort_treats_invalid_as_epoch() {
        let data = records(vec![
            json!({"Date Collected": "2024-02-01"}),
            json!({"Date Collected": "soon"}),
            json!({"Date Collected": "2023-12-31T10:00:00Z"}),
        ]);
        let mut rows: Vec<_> = data.iter().collect();
        let spec = SortSpec {
            column: "Date Collected".into(),
            direction: SortDirection::Desc,
        };
        sort(&mut rows, pins(), &spec);
        assert_eq!(ids(&rows), vec!["rec0000", "rec0002", "rec0001"]);
    }

    #[test]
    fn text_sort_is_case_sensitive() {
        let data = records(vec![
            json!({"Pin Title": "banana"}),
            json!({"Pin Title": "Apple"}),
            json!({"Pin Title": "apple"}),
        ]);
        let mut rows: Vec<_> = data.iter().collect();
        let spec = SortSpec {
            column: "Pin Title".into(),
            direction: SortDirection::Asc,
        };
        sort(&mut rows, pins(), &spec);
        assert_eq!(ids(&rows), vec!["rec0001", "rec0002", "rec0000"]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let data = records(vec![
            json!({"Status": "Active", "Pin Title": "a"}),
            json!({"Status": "Paused", "Pin Title": "b"}),
            json!({"Status": "Active", "Pin Title": "c"}),
        ]);
        let mut rows: Vec<_> = data.iter().collect();
        let spec = SortSpec {
            column: "Status".into(),
            direction: SortDirection::Desc,
        };
        sort(&mut rows, pins(), &spec);
        assert_eq!(ids(&rows), vec!["rec0001", "rec0000", "rec0002"]);
    }

    #[test]
    fn apply_pages_sorted_rows() {
        let data = numbered_pins(25);
        let mut state = ViewState::default();
        state.set_sort(pins(), "Saves").unwrap();
        state.set_sort(pins(), "Saves").unwrap();
        state.set_page(2);

        let result = apply(&data, pins(), &state);
        assert_eq!(result.window.len(), 5);
        let page = result.page_rows();
        assert_eq!(page[0].id, "pin0004");
        assert_eq!(page[4].id, "pin0000");
    }
}
