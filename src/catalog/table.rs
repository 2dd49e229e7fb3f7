//! Table capabilities
//!
//! `Table` is the seam between the facade and a concrete table kind. Only
//! schema, estimate, explain, execution and the unique column are required;
//! capability negotiation and mutations default to "none supported".

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{DasError, DasResult};
use crate::executor::RowStream;
use crate::query::{PathKey, Qualifier, QuerySpec, SortKey};
use crate::schema::{Row, TableDefinition, Value};

/// Approximate cost of scanning a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub rows: u64,
    pub bytes: u64,
}

/// A named table inside an instance
pub trait Table: Send + Sync {
    /// Table name, unique within its instance
    fn name(&self) -> &str;

    /// Schema with stable column order
    fn definition(&self) -> TableDefinition;

    /// Returns the requested sort keys this table satisfies natively
    fn sort_orders(&self, _requested: &[SortKey]) -> Vec<SortKey> {
        Vec::new()
    }

    /// Returns the column sets this table can look rows up by
    fn path_keys(&self) -> Vec<PathKey> {
        Vec::new()
    }

    /// Approximate (rows, bytes) for a scan with these qualifiers and columns
    fn estimate(&self, quals: &[Qualifier], columns: &[String]) -> Estimate;

    /// Ordered, human-readable plan lines for a query
    fn explain(&self, query: &QuerySpec) -> Vec<String>;

    /// Starts a lazy execution of `query`, observing `cancel`
    fn execute(&self, query: &QuerySpec, cancel: CancellationToken) -> RowStream;

    /// Column that uniquely identifies rows
    fn unique_column(&self) -> &str;

    /// Preferred number of rows per bulk insert
    fn bulk_insert_size(&self) -> usize {
        1
    }

    fn insert(&self, _row: &Row) -> DasResult<Row> {
        Err(DasError::unsupported("Insert"))
    }

    fn bulk_insert(&self, _rows: &[Row]) -> DasResult<Vec<Row>> {
        Err(DasError::unsupported("Bulk insert"))
    }

    fn update(&self, _row_id: &Value, _new_row: &Row) -> DasResult<Row> {
        Err(DasError::unsupported("Update"))
    }

    fn delete(&self, _row_id: &Value) -> DasResult<()> {
        Err(DasError::unsupported("Delete"))
    }
}

/// Longest prefix of `requested` made only of keys in `supported`.
///
/// A sort order is only useful to the caller as a prefix, so the first
/// unsupported key ends negotiation.
pub fn negotiate_sort_orders(requested: &[SortKey], supported: &[SortKey]) -> Vec<SortKey> {
    requested
        .iter()
        .take_while(|key| supported.contains(key))
        .cloned()
        .collect()
}
