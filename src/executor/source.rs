//! Row sources
//!
//! A row source defines a table's generation order and per-column values.
//! Rows are identified by a 1-based ordinal in generation order.

use crate::query::ColumnLookup;
use crate::schema::Value;

/// Row-generation capability bound to a table at creation time
pub trait RowSource: Send + Sync {
    /// Number of rows the source produces, `None` when unbounded
    fn natural_bound(&self) -> Option<u64>;

    /// Columns used when a query does not project any, in declared order
    fn default_columns(&self) -> Vec<String>;

    /// Computes the value of `column` for the row at `ordinal`.
    ///
    /// Returns `None` when the source does not know the column.
    fn value_at(&self, ordinal: u64, column: &str) -> Option<Value>;
}

/// Placeholder for projected columns the source does not know
pub fn placeholder_value(column: &str, ordinal: u64) -> Value {
    Value::String(format!("Value for {} @ row {}", column, ordinal))
}

/// A row of a source viewed through `ColumnLookup` for qualifier checks
pub struct RowView<'a> {
    source: &'a dyn RowSource,
    ordinal: u64,
}

impl<'a> RowView<'a> {
    pub fn new(source: &'a dyn RowSource, ordinal: u64) -> Self {
        Self { source, ordinal }
    }
}

impl ColumnLookup for RowView<'_> {
    fn value_of(&self, column: &str) -> Option<Value> {
        self.source.value_at(self.ordinal, column)
    }
}

/// Source whose rows are the ordinals `1..=rows`.
///
/// Columns: `id` (the ordinal) and `name` (`"Row #<ordinal>"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalSource {
    rows: Option<u64>,
}

impl OrdinalSource {
    /// Source with a fixed number of rows
    pub fn bounded(rows: u64) -> Self {
        Self { rows: Some(rows) }
    }

    /// Source that never runs out of rows
    pub fn unbounded() -> Self {
        Self { rows: None }
    }
}

impl RowSource for OrdinalSource {
    fn natural_bound(&self) -> Option<u64> {
        self.rows
    }

    fn default_columns(&self) -> Vec<String> {
        vec!["id".to_string(), "name".to_string()]
    }

    fn value_at(&self, ordinal: u64, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Int(ordinal as i64)),
            "name" => Some(Value::String(format!("Row #{}", ordinal))),
            _ => None,
        }
    }
}
