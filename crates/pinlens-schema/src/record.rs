//! Record model
//!
//! A [`Record`] is one row as the remote store delivers it. Records are
//! immutable snapshots: consumers read them, never write them back in place.

use crate::alias::LogicalField;
use crate::registry::TableKind;
use crate::value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stored row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable record identifier
    pub id: String,
    /// Column key to untyped value
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Store creation timestamp
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl Record {
    /// Create record with fields
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
            created_time: None,
        }
    }

    /// Build record from a JSON object literal
    ///
    /// Non-object values produce a record with no fields.
    #[must_use]
    pub fn from_json(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    /// Raw value for a column key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Coerced string for a column key; absent is empty
    #[inline]
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        value::coerce_opt_string(self.get(key))
    }

    /// Resolve a logical field through its alias list
    #[inline]
    #[must_use]
    pub fn logical(&self, field: LogicalField) -> Option<&Value> {
        field.resolve(self)
    }

    /// Coerced string of a logical field, if present
    #[inline]
    #[must_use]
    pub fn logical_text(&self, field: LogicalField) -> Option<String> {
        self.logical(field).map(value::coerce_string)
    }
}

/// Point-in-time record set for every table
///
/// Replaced wholesale on each refresh. Tables that were never loaded read as
/// empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    tables: IndexMap<TableKind, Vec<Record>>,
}

impl TableSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With records for one table
    #[must_use]
    pub fn with_table(mut self, kind: TableKind, records: Vec<Record>) -> Self {
        self.insert(kind, records);
        self
    }

    /// Replace one table's records
    pub fn insert(&mut self, kind: TableKind, records: Vec<Record>) {
        self.tables.insert(kind, records);
    }

    /// Records for a table; empty when not loaded
    #[inline]
    #[must_use]
    pub fn get(&self, kind: TableKind) -> &[Record] {
        self.tables.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total records across tables
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Whether no table holds a record
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Iterate over loaded tables
    pub fn iter(&self) -> impl Iterator<Item = (TableKind, &[Record])> {
        self.tables.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

impl FromIterator<(TableKind, Vec<Record>)> for TableSet {
    fn from_iter<I: IntoIterator<Item = (TableKind, Vec<Record>)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
