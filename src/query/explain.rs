//! Explain output for table queries
//!
//! Produces deterministic, human-readable plan lines in a fixed order:
//! scan, filters, projection, limit, batching.

use super::ast::QuerySpec;

/// Description of how a table would execute a query
#[derive(Debug, Clone)]
pub struct ExplainPlan {
    /// Table being scanned
    pub table: String,
    /// Natural row bound of the table, `None` for unbounded sources
    pub natural_bound: Option<u64>,
    /// Rendered qualifiers, in request order
    pub filters: Vec<String>,
    /// Projected columns
    pub columns: Vec<String>,
    /// Whether `columns` came from the table default
    pub default_projection: bool,
    /// Requested row cap
    pub limit: Option<u64>,
    /// Rows per emitted batch
    pub batch_size: usize,
}

impl ExplainPlan {
    /// Builds an explain plan for a query against a table
    pub fn build(
        table: &str,
        natural_bound: Option<u64>,
        default_columns: &[String],
        query: &QuerySpec,
        batch_size: usize,
    ) -> Self {
        let default_projection = query.columns.is_empty();
        let columns = if default_projection {
            default_columns.to_vec()
        } else {
            query.columns.clone()
        };

        Self {
            table: table.to_string(),
            natural_bound,
            filters: query.quals.iter().map(|q| q.to_string()).collect(),
            columns,
            default_projection,
            limit: query.limit,
            batch_size,
        }
    }

    /// Renders the plan as ordered lines
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4 + self.filters.len());

        match self.natural_bound {
            Some(bound) => lines.push(format!(
                "Ordinal scan on {} (rows 1..{})",
                self.table, bound
            )),
            None => lines.push(format!("Ordinal scan on {} (unbounded)", self.table)),
        }

        for filter in &self.filters {
            lines.push(format!("  Filter: {}", filter));
        }

        let suffix = if self.default_projection { " (default)" } else { "" };
        lines.push(format!("  Projection: {}{}", self.columns.join(", "), suffix));

        match self.limit {
            Some(limit) => lines.push(format!("  Limit: {}", limit)),
            None => lines.push("  Limit: none".to_string()),
        }

        lines.push(format!("  Batch size: {}", self.batch_size));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Qualifier;
    use crate::schema::Value;

    fn defaults() -> Vec<String> {
        vec!["id".to_string(), "name".to_string()]
    }

    #[test]
    fn test_explain_lines_order() {
        let query = QuerySpec::new()
            .with_qual(Qualifier::gt("id", Value::Int(7)))
            .with_limit(3);
        let lines = ExplainPlan::build("small_table", Some(10), &defaults(), &query, 5).to_lines();

        assert_eq!(
            lines,
            vec![
                "Ordinal scan on small_table (rows 1..10)",
                "  Filter: id > 7",
                "  Projection: id, name (default)",
                "  Limit: 3",
                "  Batch size: 5",
            ]
        );
    }

    #[test]
    fn test_explain_is_deterministic() {
        let query = QuerySpec::new().with_columns(["name"]);
        let a = ExplainPlan::build("t", None, &defaults(), &query, 5).to_lines();
        let b = ExplainPlan::build("t", None, &defaults(), &query, 5).to_lines();
        assert_eq!(a, b);
        assert_eq!(a[0], "Ordinal scan on t (unbounded)");
        assert_eq!(a[1], "  Projection: name");
    }
}
