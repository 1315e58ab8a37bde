//! Error types for the Schema Registry

/// Schema lookup errors
///
/// Both variants are configuration errors: a correct caller never produces
/// them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No table kind with this name
    #[error("unknown table: '{0}'")]
    UnknownTable(String),

    /// Column key not declared by the table's schema
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table slug
        table: String,
        /// Requested column key
        column: String,
    },
}

impl SchemaError {
    /// Create unknown column error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}
