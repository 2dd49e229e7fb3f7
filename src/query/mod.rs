//! Query pushdown model
//!
//! Callers push qualifiers, projections, sort keys and a row limit down to
//! tables. This module defines those shapes, evaluates qualifiers against
//! candidate rows, and renders explain output.
//!
//! # Qualifier semantics
//!
//! - Qualifiers combine with AND
//! - Evaluation order never changes the result
//! - Anything that cannot be evaluated is vacuously true

mod ast;
mod evaluator;
mod explain;

pub use ast::{Literal, Operator, PathKey, Qualifier, QualifierPredicate, QuerySpec, SortKey};
pub use evaluator::{ColumnLookup, QualifierEvaluator};
pub use explain::ExplainPlan;
