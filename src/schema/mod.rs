//! Table schema and row data model
//!
//! - `Value`: typed scalar carried in rows and qualifier literals
//! - `ColumnType` / `ColumnDefinition` / `TableDefinition`: immutable table schema
//! - `Row` / `Column` / `RowBatch`: streamed query results
//!
//! A table's column order is fixed for the table's lifetime.

mod row;
mod types;
mod value;

pub use row::{Column, Row, RowBatch};
pub use types::{ColumnDefinition, ColumnType, TableDefinition};
pub use value::Value;
