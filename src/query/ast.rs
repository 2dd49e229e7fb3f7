//! Query structures pushed down by callers
//!
//! Defines qualifiers, sort keys, path keys and the query spec consumed by
//! table execution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// Comparison operators carried by qualifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    Ilike,
    NotIlike,
    /// Any operator this server does not know; never excludes rows
    #[serde(other)]
    Unrecognized,
}

impl Operator {
    /// Returns the operator symbol for explain output
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Ilike => "ILIKE",
            Operator::NotIlike => "NOT ILIKE",
            Operator::Unrecognized => "<unrecognized>",
        }
    }

    /// Returns true for the six ordered comparison operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Equals
                | Operator::NotEquals
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
        )
    }

    /// Returns true for `=` and `<>`
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Literal carried by a qualifier.
///
/// Value kinds outside `Value` (timestamps, decimals, ...) are kept as raw
/// JSON so the call still goes through; they never compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Known(Value),
    Unknown(serde_json::Value),
}

impl Literal {
    /// Returns the typed value, if this server understands it
    pub fn known(&self) -> Option<&Value> {
        match self {
            Literal::Known(v) => Some(v),
            Literal::Unknown(_) => None,
        }
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        Literal::Known(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Known(v) => write!(f, "{}", v),
            Literal::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Shape of a qualifier's predicate.
///
/// Only `Simple` is evaluated; the list shapes and any shape tag this
/// server does not know deserialize fine and never exclude rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualifierPredicate {
    /// column <op> value
    Simple { operator: Operator, value: Literal },
    /// column <op> ANY(values)
    IsAny {
        operator: Operator,
        values: Vec<Literal>,
    },
    /// column <op> ALL(values)
    IsAll {
        operator: Operator,
        values: Vec<Literal>,
    },
    #[serde(other)]
    Unrecognized,
}

/// A predicate over one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    /// Column name
    pub name: String,
    pub predicate: QualifierPredicate,
}

impl Qualifier {
    /// Create a simple `column <op> value` qualifier
    pub fn simple(name: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            name: name.into(),
            predicate: QualifierPredicate::Simple {
                operator,
                value: value.into(),
            },
        }
    }

    /// Create an equality qualifier
    pub fn eq(name: impl Into<String>, value: Value) -> Self {
        Self::simple(name, Operator::Equals, value)
    }

    /// Create a greater-than qualifier
    pub fn gt(name: impl Into<String>, value: Value) -> Self {
        Self::simple(name, Operator::GreaterThan, value)
    }

    /// Create a less-than qualifier
    pub fn lt(name: impl Into<String>, value: Value) -> Self {
        Self::simple(name, Operator::LessThan, value)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            QualifierPredicate::Simple { operator, value } => {
                write!(f, "{} {} {}", self.name, operator, value)
            }
            QualifierPredicate::IsAny { operator, values } => {
                write!(f, "{} {} ANY({})", self.name, operator, join_values(values))
            }
            QualifierPredicate::IsAll { operator, values } => {
                write!(f, "{} {} ALL({})", self.name, operator, join_values(values))
            }
            QualifierPredicate::Unrecognized => write!(f, "{} <unrecognized>", self.name),
        }
    }
}

fn join_values(values: &[Literal]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Requested sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub name: String,
    #[serde(default)]
    pub is_reversed: bool,
    #[serde(default)]
    pub nulls_first: bool,
}

impl SortKey {
    /// Ascending sort on a column
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_reversed: false,
            nulls_first: false,
        }
    }

    /// Descending sort on a column
    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_reversed: true,
            nulls_first: false,
        }
    }
}

/// A set of columns the table can look rows up by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathKey {
    pub key_columns: Vec<String>,
    pub expected_rows: u64,
}

/// A filtered, projected, limited query against one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Qualifiers combined with AND; empty means no filtering
    #[serde(default)]
    pub quals: Vec<Qualifier>,
    /// Projection; empty means the table's default columns
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub sort_keys: Vec<SortKey>,
    /// Row cap; absent means source-bound
    #[serde(default)]
    pub limit: Option<u64>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_qual(mut self, qual: Qualifier) -> Self {
        self.quals.push(qual);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_qualifier_wire_shape() {
        let qual = Qualifier::gt("id", Value::Int(7));
        let json = serde_json::to_value(&qual).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "id",
                "predicate": {"kind": "simple", "operator": "greater_than", "value": {"int": 7}}
            })
        );
    }

    #[test]
    fn test_unknown_predicate_shape_deserializes() {
        let qual: Qualifier = serde_json::from_value(json!({
            "name": "id",
            "predicate": {"kind": "between", "low": {"int": 1}}
        }))
        .unwrap();
        assert_eq!(qual.predicate, QualifierPredicate::Unrecognized);
    }

    #[test]
    fn test_unknown_value_kind_deserializes() {
        let qual: Qualifier = serde_json::from_value(json!({
            "name": "id",
            "predicate": {"kind": "simple", "operator": "equals", "value": {"timestamp": "2024-01-01"}}
        }))
        .unwrap();

        match qual.predicate {
            QualifierPredicate::Simple { operator, value } => {
                assert_eq!(operator, Operator::Equals);
                assert_eq!(value, Literal::Unknown(json!({"timestamp": "2024-01-01"})));
                assert!(value.known().is_none());
            }
            other => panic!("unexpected predicate {:?}", other),
        }
    }

    #[test]
    fn test_known_value_stays_typed() {
        let qual: Qualifier = serde_json::from_value(json!({
            "name": "id",
            "predicate": {"kind": "simple", "operator": "equals", "value": "null"}
        }))
        .unwrap();
        assert_eq!(qual, Qualifier::eq("id", Value::Null));
    }

    #[test]
    fn test_unknown_operator_deserializes() {
        let qual: Qualifier = serde_json::from_value(json!({
            "name": "id",
            "predicate": {"kind": "simple", "operator": "plus", "value": {"int": 1}}
        }))
        .unwrap();
        assert_eq!(
            qual.predicate,
            QualifierPredicate::Simple {
                operator: Operator::Unrecognized,
                value: Literal::Known(Value::Int(1)),
            }
        );
        assert!(!Operator::Unrecognized.is_comparison());
    }

    #[test]
    fn test_query_spec_defaults() {
        let spec: QuerySpec = serde_json::from_value(json!({})).unwrap();
        assert!(spec.quals.is_empty());
        assert!(spec.columns.is_empty());
        assert_eq!(spec.limit, None);
    }

    #[test]
    fn test_qualifier_display() {
        assert_eq!(Qualifier::gt("id", Value::Int(7)).to_string(), "id > 7");
        assert_eq!(
            Qualifier::eq("name", Value::string("x")).to_string(),
            "name = 'x'"
        );
    }
}
