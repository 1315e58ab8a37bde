//! Per-table view state machine
//!
//! A [`ViewState`] is the `{page, page_size, search, sort, facets}` tuple
//! for one table. Every transition except [`ViewState::set_page`] resets the
//! page to 1. Transitions that name a column validate it against the
//! table's schema and leave the state untouched when it is unknown.

use crate::error::{reject, ViewError};
use indexmap::IndexMap;
use pinlens_schema::TableSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial page size for every table view
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// The other direction
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header indicator glyph
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Active sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key
    pub column: String,
    /// Direction
    pub direction: SortDirection,
}

/// View state for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    page: usize,
    page_size: usize,
    search: String,
    sort: Option<SortSpec>,
    facets: IndexMap<String, String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// Fresh state on page 1 with no search, sort or facets
    ///
    /// A zero page size is raised to 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            sort: None,
            facets: IndexMap::new(),
        }
    }

    /// Requested page (1-based, clamped at render time)
    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page
    #[inline]
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Normalized search text
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Active sort, if any
    #[inline]
    #[must_use]
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Exact-match column filters, in insertion order
    #[inline]
    #[must_use]
    pub fn facets(&self) -> &IndexMap<String, String> {
        &self.facets
    }

    /// Whether a search or facet narrows the rows
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.facets.is_empty()
    }

    /// Set the search text (trimmed, lowercased)
    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
        self.page = 1;
        tracing::trace!("View search set to {:?}", self.search);
    }

    /// Sort by `column`
    ///
    /// Re-sorting the active column flips its direction; a new column
    /// starts ascending.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] when the schema does not declare `column`.
    pub fn set_sort(&mut self, schema: &TableSchema, column: &str) -> Result<(), ViewError> {
        validate_column(schema, column)?;
        let direction = match &self.sort {
            Some(current) if current.column == column => current.direction.flip(),
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
        self.page = 1;
        tracing::trace!("View sorted by {} {}", column, direction);
        Ok(())
    }

    /// Jump to page `n`; out-of-range pages are clamped when rendering
    pub fn set_page(&mut self, n: usize) {
        self.page = n.max(1);
        tracing::trace!("View page set to {}", self.page);
    }

    /// Change rows per page
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPageSize`] for `0`.
    pub fn set_page_size(&mut self, n: usize) -> Result<(), ViewError> {
        if n == 0 {
            return Err(reject(ViewError::InvalidPageSize(n)));
        }
        self.page_size = n;
        self.page = 1;
        Ok(())
    }

    /// Keep only rows whose `column` coerces to exactly `value`
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] when the schema does not declare `column`.
    pub fn set_facet(
        &mut self,
        schema: &TableSchema,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), ViewError> {
        validate_column(schema, column)?;
        let value = value.into();
        tracing::trace!("View facet {} = {:?}", column, value);
        self.facets.insert(column.to_string(), value);
        self.page = 1;
        Ok(())
    }

    /// Remove the facet on `column`, if any
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] when the schema does not declare `column`.
    pub fn clear_facet(&mut self, schema: &TableSchema, column: &str) -> Result<(), ViewError> {
        validate_column(schema, column)?;
        self.facets.shift_remove(column);
        self.page = 1;
        Ok(())
    }

    /// Drop the search text and every facet
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.facets.clear();
        self.page = 1;
        tracing::trace!("View filters cleared");
    }
}

fn validate_column(schema: &TableSchema, column: &str) -> Result<(), ViewError> {
    if schema.contains(column) {
        return Ok(());
    }
    Err(reject(ViewError::unknown_column(schema.kind().slug(), column)))
}
