//! Qualifier evaluation for table execution
//!
//! Decides row inclusion from a set of column-scoped qualifiers.
//! AND semantics, pure, no side effects.
//!
//! A qualifier excludes a row only when it can actually be evaluated:
//! unknown columns, unrecognized predicate shapes, operators or value
//! kinds, and mismatched or null value types never exclude a row.

use std::cmp::Ordering;

use crate::schema::Value;

use super::ast::{Operator, Qualifier, QualifierPredicate};

/// Read access to a candidate row's values by column name
pub trait ColumnLookup {
    /// Returns the value of the named column, or `None` if the row source
    /// does not know the column
    fn value_of(&self, column: &str) -> Option<Value>;
}

/// Evaluates qualifier sets against candidate rows
pub struct QualifierEvaluator;

impl QualifierEvaluator {
    /// Checks if a row satisfies every qualifier
    pub fn matches<R: ColumnLookup + ?Sized>(row: &R, quals: &[Qualifier]) -> bool {
        quals.iter().all(|qual| Self::matches_qualifier(row, qual))
    }

    /// Checks a single qualifier; `true` when it cannot be evaluated
    fn matches_qualifier<R: ColumnLookup + ?Sized>(row: &R, qual: &Qualifier) -> bool {
        let (operator, literal) = match &qual.predicate {
            QualifierPredicate::Simple { operator, value } => match value.known() {
                Some(value) => (*operator, value),
                None => return true,
            },
            _ => return true,
        };

        let actual = match row.value_of(&qual.name) {
            Some(v) => v,
            None => return true,
        };

        Self::apply(operator, &actual, literal).unwrap_or(true)
    }

    /// Applies `operator(actual, literal)`; `None` if not evaluable
    fn apply(operator: Operator, actual: &Value, literal: &Value) -> Option<bool> {
        if !operator.is_comparison() {
            return None;
        }
        // Booleans only support equality
        if matches!(actual, Value::Bool(_)) && !operator.is_equality() {
            return None;
        }

        let ordering = actual.compare(literal)?;
        Some(match operator {
            Operator::Equals => ordering == Ordering::Equal,
            Operator::NotEquals => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            _ => return None,
        })
    }
}
