//! pinlens Schema Registry
//!
//! Static description of every mirrored table plus the record model the
//! rest of the workspace computes over.
//!
//! # Core Concepts
//!
//! - [`TableKind`]: Closed set of mirrored tables
//! - [`TableSchema`]: Ordered [`ColumnDescriptor`]s plus table metadata
//! - [`ColumnType`]: The eight column types; drives sorting and rendering
//! - [`Record`]: Identifier plus untyped field map, as delivered by the store
//! - [`LogicalField`]: Alias table for fields that arrive under several raw keys
//!
//! # Example
//!
//! ```rust
//! use pinlens_schema::{describe, ColumnType, TableKind};
//!
//! let schema = describe(TableKind::PinAnalysis);
//! assert_eq!(schema.unit(), "analyses");
//!
//! let cta = schema.column("CTA Strength").unwrap();
//! assert_eq!(cta.column_type, ColumnType::Number);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod alias;
mod column;
mod error;
mod escape;
mod record;
mod registry;
pub mod value;

// Re-exports
pub use alias::LogicalField;
pub use column::{ColumnDescriptor, ColumnType};
pub use error::SchemaError;
pub use escape::escape_html;
pub use record::{Record, TableSet};
pub use registry::{describe, TableKind, TableSchema};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
