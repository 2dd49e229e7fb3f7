//! Ordinal-backed tables
//!
//! Rows are generated as ordinals `1..=N` (or without bound), with columns
//! `id` and `name`. Used by the `mock` instance kind.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::executor::{OrdinalSource, RowSource, RowStream};
use crate::query::{ExplainPlan, Operator, Qualifier, QualifierPredicate, QuerySpec, SortKey};
use crate::schema::{ColumnDefinition, ColumnType, TableDefinition};

use super::table::{negotiate_sort_orders, Estimate, Table};

/// Row count reported for unbounded tables
const UNBOUNDED_ESTIMATE_ROWS: u64 = 1_000_000_000;

/// Width assumed for projected columns the table does not declare
const UNKNOWN_COLUMN_WIDTH: u64 = 16;

/// Table whose rows are generated from their ordinal
pub struct OrdinalTable {
    name: String,
    source: Arc<OrdinalSource>,
    batch_size: usize,
    native_sort: Vec<SortKey>,
}

impl OrdinalTable {
    /// Table with `rows` rows
    pub fn new(name: impl Into<String>, rows: u64, batch_size: usize) -> Self {
        Self::with_source(name, OrdinalSource::bounded(rows), batch_size)
    }

    /// Table that never runs out of rows
    pub fn unbounded(name: impl Into<String>, batch_size: usize) -> Self {
        Self::with_source(name, OrdinalSource::unbounded(), batch_size)
    }

    fn with_source(name: impl Into<String>, source: OrdinalSource, batch_size: usize) -> Self {
        Self {
            name: name.into(),
            source: Arc::new(source),
            batch_size: batch_size.max(1),
            native_sort: Vec::new(),
        }
    }

    /// Declares sort keys this table satisfies without extra work
    pub fn with_native_sort(mut self, keys: Vec<SortKey>) -> Self {
        self.native_sort = keys;
        self
    }

    pub fn natural_bound(&self) -> Option<u64> {
        self.source.natural_bound()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn column_width(&self, definition: &TableDefinition, column: &str) -> u64 {
        definition
            .column(column)
            .map(|c| c.column_type.estimated_width())
            .unwrap_or(UNKNOWN_COLUMN_WIDTH)
    }

    /// True if a qualifier pins the unique column to one comparable value
    fn is_point_lookup(&self, quals: &[Qualifier]) -> bool {
        quals.iter().any(|q| {
            q.name == self.unique_column()
                && match &q.predicate {
                    QualifierPredicate::Simple {
                        operator: Operator::Equals,
                        value,
                    } => value.known().is_some(),
                    _ => false,
                }
        })
    }
}

impl Table for OrdinalTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> TableDefinition {
        let description = match self.natural_bound() {
            Some(rows) => format!("A table with {} rows.", rows),
            None => "A table with an unbounded number of rows.".to_string(),
        };

        TableDefinition {
            name: self.name.clone(),
            description,
            columns: vec![
                ColumnDefinition::new("id", "Primary key", ColumnType::Int { nullable: false }),
                ColumnDefinition::new("name", "Name field", ColumnType::String { nullable: false }),
            ],
            startup_cost: 1,
        }
    }

    fn sort_orders(&self, requested: &[SortKey]) -> Vec<SortKey> {
        negotiate_sort_orders(requested, &self.native_sort)
    }

    fn estimate(&self, quals: &[Qualifier], columns: &[String]) -> Estimate {
        let rows = if self.is_point_lookup(quals) {
            1
        } else {
            self.natural_bound().unwrap_or(UNBOUNDED_ESTIMATE_ROWS)
        };

        let definition = self.definition();
        let width: u64 = if columns.is_empty() {
            definition
                .columns
                .iter()
                .map(|c| c.column_type.estimated_width())
                .sum()
        } else {
            columns
                .iter()
                .map(|c| self.column_width(&definition, c))
                .sum()
        };

        Estimate {
            rows,
            bytes: rows.saturating_mul(width),
        }
    }

    fn explain(&self, query: &QuerySpec) -> Vec<String> {
        ExplainPlan::build(
            &self.name,
            self.natural_bound(),
            &self.source.default_columns(),
            query,
            self.batch_size,
        )
        .to_lines()
    }

    fn execute(&self, query: &QuerySpec, cancel: CancellationToken) -> RowStream {
        let source: Arc<dyn RowSource> = self.source.clone();
        RowStream::new(self.name.clone(), source, query, self.batch_size, cancel)
    }

    fn unique_column(&self) -> &str {
        "id"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DasError;
    use crate::query::Literal;
    use crate::schema::{Row, Value};

    #[test]
    fn test_definition() {
        let table = OrdinalTable::new("small_table", 10, 5);
        let def = table.definition();
        assert_eq!(def.name, "small_table");
        assert_eq!(def.column_names(), vec!["id", "name"]);
        assert_eq!(def.description, "A table with 10 rows.");
    }

    #[test]
    fn test_reference_capabilities_are_empty() {
        let table = OrdinalTable::new("t", 10, 5);
        assert!(table.sort_orders(&[SortKey::asc("id")]).is_empty());
        assert!(table.path_keys().is_empty());
        assert_eq!(table.unique_column(), "id");
        assert_eq!(table.bulk_insert_size(), 1);
    }

    #[test]
    fn test_declared_sort_support() {
        let table = OrdinalTable::new("t", 10, 5).with_native_sort(vec![SortKey::asc("id")]);
        let accepted = table.sort_orders(&[SortKey::asc("id"), SortKey::asc("name")]);
        assert_eq!(accepted, vec![SortKey::asc("id")]);
    }

    #[test]
    fn test_mutations_unsupported() {
        let table = OrdinalTable::new("t", 10, 5);
        let row = Row::default();
        assert_eq!(table.insert(&row), Err(DasError::unsupported("Insert")));
        assert!(matches!(table.bulk_insert(&[row.clone()]), Err(DasError::Unsupported(_))));
        assert!(matches!(table.update(&Value::Int(1), &row), Err(DasError::Unsupported(_))));
        assert!(matches!(table.delete(&Value::Int(1)), Err(DasError::Unsupported(_))));
    }

    #[test]
    fn test_estimate() {
        let table = OrdinalTable::new("t", 10, 5);
        assert_eq!(table.estimate(&[], &[]), Estimate { rows: 10, bytes: 240 });
        assert_eq!(
            table.estimate(&[], &["id".to_string(), "mystery".to_string()]),
            Estimate { rows: 10, bytes: 240 }
        );
        assert_eq!(
            table.estimate(&[Qualifier::eq("id", Value::Int(3))], &["id".to_string()]),
            Estimate { rows: 1, bytes: 8 }
        );

        let unbounded = OrdinalTable::unbounded("u", 5);
        assert_eq!(unbounded.estimate(&[], &[]).rows, UNBOUNDED_ESTIMATE_ROWS);
    }

    #[test]
    fn test_unknown_literal_is_not_a_point_lookup() {
        let table = OrdinalTable::new("t", 10, 5);
        let qual = Qualifier {
            name: "id".to_string(),
            predicate: QualifierPredicate::Simple {
                operator: Operator::Equals,
                value: Literal::Unknown(serde_json::json!({"decimal": "3.0"})),
            },
        };
        assert_eq!(table.estimate(&[qual], &[]).rows, 10);
    }

    #[test]
    fn test_explain_mentions_table() {
        let table = OrdinalTable::new("large_table", 100, 5);
        let lines = table.explain(&QuerySpec::new());
        assert!(lines[0].contains("large_table"));
        assert_eq!(lines.last().unwrap(), "  Batch size: 5");
    }

    #[test]
    fn test_execute_uses_table_batch_size() {
        let table = OrdinalTable::new("t", 10, 4);
        let sizes: Vec<_> = table
            .execute(&QuerySpec::new(), CancellationToken::new())
            .map(|b| b.len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }
}
