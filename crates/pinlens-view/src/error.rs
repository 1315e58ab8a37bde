//! Error types for the Table View Engine

/// Rejected view state transitions
///
/// These are programmer errors (a column key the schema does not declare,
/// a zero page size). The transition leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Sort or facet on an undeclared column
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table slug
        table: String,
        /// Requested column key
        column: String,
    },

    /// Page size must be at least one
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),
}

impl ViewError {
    /// Create unknown column error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Check if error names a column
    #[must_use]
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn { .. })
    }
}

/// Surface a rejected transition
///
/// Returns the error for the caller to propagate. With the `strict-debug`
/// feature the transition panics instead.
pub(crate) fn reject(err: ViewError) -> ViewError {
    if crate::strict_debug() {
        panic!("Illegal view transition: {err}");
    }
    tracing::warn!("Rejected view transition: {}", err);
    err
}
