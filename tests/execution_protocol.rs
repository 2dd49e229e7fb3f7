//! Execution Protocol Tests
//!
//! Tests for streaming table execution:
//! - Limits cap rows by generation ordinal
//! - Qualifiers filter with AND semantics
//! - Projection keeps exactly the requested columns
//! - Batch boundaries carry no meaning
//! - Cancellation truncates and finalizes exactly once

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use das_server::catalog::{OrdinalTable, Table};
use das_server::executor::{RowStream, StreamState, StreamSummary};
use das_server::query::{Operator, Qualifier, QuerySpec};
use das_server::schema::{Row, Value};
use tokio_util::sync::CancellationToken;

// =============================================================================
// Helper Functions
// =============================================================================

fn small_table(batch_size: usize) -> OrdinalTable {
    OrdinalTable::new("small_table", 10, batch_size)
}

fn collect(table: &OrdinalTable, query: &QuerySpec) -> Vec<Row> {
    table
        .execute(query, CancellationToken::new())
        .flat_map(|batch| batch.rows)
        .collect()
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| row.get("id").and_then(Value::as_int).unwrap())
        .collect()
}

/// Attaches a hook counting finalizations and keeping the last summary
fn observed(
    stream: RowStream,
) -> (RowStream, Arc<AtomicUsize>, Arc<Mutex<Option<StreamSummary>>>) {
    let count = Arc::new(AtomicUsize::new(0));
    let summary = Arc::new(Mutex::new(None));
    let (c, s) = (count.clone(), summary.clone());
    let stream = stream.on_finalize(move |done| {
        c.fetch_add(1, Ordering::SeqCst);
        *s.lock().unwrap() = Some(done.clone());
    });
    (stream, count, summary)
}

fn holds(op: Operator, r: i64, v: i64) -> bool {
    match op {
        Operator::Equals => r == v,
        Operator::NotEquals => r != v,
        Operator::GreaterThan => r > v,
        Operator::GreaterThanOrEqual => r >= v,
        Operator::LessThan => r < v,
        Operator::LessThanOrEqual => r <= v,
        _ => true,
    }
}

const COMPARISONS: [Operator; 6] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
];

// =============================================================================
// Reference Scenarios
// =============================================================================

/// Default projection yields ordinals 1..10 with columns id and name.
#[test]
fn test_full_scan_default_projection() {
    let rows = collect(&small_table(5), &QuerySpec::new());

    assert_eq!(ids(&rows), (1..=10).collect::<Vec<_>>());
    for row in &rows {
        assert_eq!(row.column_names(), vec!["id", "name"]);
    }
    assert_eq!(rows[2].get("name"), Some(&Value::string("Row #3")));
}

/// `id > 7` keeps ordinals 8, 9 and 10 only.
#[test]
fn test_greater_than_filter() {
    let query = QuerySpec::new().with_qual(Qualifier::gt("id", Value::int(7)));
    assert_eq!(ids(&collect(&small_table(5), &query)), vec![8, 9, 10]);
}

/// `limit = 3` yields ordinals 1..3 whatever the batch size.
#[test]
fn test_limit_independent_of_batch_size() {
    let query = QuerySpec::new().with_limit(3);
    for batch_size in [1, 2, 3, 5, 100] {
        assert_eq!(ids(&collect(&small_table(batch_size), &query)), vec![1, 2, 3]);
    }
}

// =============================================================================
// Limit Tests
// =============================================================================

/// For every L <= N, rows are the qualifying ordinals in 1..L, ascending.
#[test]
fn test_limit_caps_by_ordinal() {
    let table = small_table(4);
    let qual = Qualifier::simple("id", Operator::NotEquals, Value::int(2));

    for limit in 0..=10u64 {
        let query = QuerySpec::new().with_limit(limit).with_qual(qual.clone());
        let got = ids(&collect(&table, &query));
        let expected: Vec<i64> = (1..=limit as i64).filter(|r| *r != 2).collect();
        assert_eq!(got, expected, "limit {}", limit);
        assert!(got.len() as u64 <= limit);
    }
}

/// A limit above the natural bound is capped by the bound.
#[test]
fn test_limit_above_bound() {
    let query = QuerySpec::new().with_limit(1_000);
    assert_eq!(collect(&small_table(3), &query).len(), 10);
}

/// An unbounded table terminates through its limit.
#[test]
fn test_unbounded_table_with_limit() {
    let table = OrdinalTable::unbounded("endless", 5);
    let query = QuerySpec::new().with_limit(12);
    assert_eq!(ids(&collect(&table, &query)), (1..=12).collect::<Vec<_>>());
}

// =============================================================================
// Qualifier Tests
// =============================================================================

/// Each comparison operator includes ordinal r iff op(r, v) holds.
#[test]
fn test_each_operator_matches_reference() {
    let table = small_table(3);
    for op in COMPARISONS {
        for v in 0..=11 {
            let query = QuerySpec::new().with_qual(Qualifier::simple("id", op, Value::int(v)));
            let expected: Vec<i64> = (1..=10).filter(|r| holds(op, *r, v)).collect();
            assert_eq!(ids(&collect(&table, &query)), expected, "{} {}", op, v);
        }
    }
}

/// Two qualifiers together equal the intersection of each alone.
#[test]
fn test_qualifiers_combine_with_and() {
    let table = small_table(5);
    let a = Qualifier::simple("id", Operator::GreaterThanOrEqual, Value::int(3));
    let b = Qualifier::simple("id", Operator::LessThan, Value::int(8));

    let only_a = ids(&collect(&table, &QuerySpec::new().with_qual(a.clone())));
    let only_b = ids(&collect(&table, &QuerySpec::new().with_qual(b.clone())));
    let both = ids(&collect(&table, &QuerySpec::new().with_qual(a).with_qual(b)));

    let intersection: Vec<i64> = only_a.into_iter().filter(|r| only_b.contains(r)).collect();
    assert_eq!(both, intersection);
    assert_eq!(both, vec![3, 4, 5, 6, 7]);
}

/// Qualifiers on unknown columns never exclude rows.
#[test]
fn test_unknown_column_qualifier_is_vacuous() {
    let query = QuerySpec::new().with_qual(Qualifier::eq("missing", Value::int(1)));
    assert_eq!(collect(&small_table(5), &query).len(), 10);
}

/// Value kinds and operators the evaluator does not know never exclude rows.
#[test]
fn test_unrecognized_value_kind_and_operator_are_vacuous() {
    let query: QuerySpec = serde_json::from_value(serde_json::json!({
        "quals": [
            {"name": "id", "predicate": {"kind": "simple", "operator": "equals", "value": {"timestamp": "2024-01-01"}}},
            {"name": "id", "predicate": {"kind": "simple", "operator": "less_than", "value": {"decimal": "3.5"}}},
            {"name": "id", "predicate": {"kind": "simple", "operator": "plus", "value": {"int": 3}}}
        ]
    }))
    .unwrap();
    assert_eq!(ids(&collect(&small_table(5), &query)), (1..=10).collect::<Vec<_>>());

    let bounded = query.with_qual(Qualifier::simple("id", Operator::GreaterThan, Value::int(8)));
    assert_eq!(ids(&collect(&small_table(5), &bounded)), vec![9, 10]);
}

/// String comparison on the name column.
#[test]
fn test_string_equality() {
    let query = QuerySpec::new().with_qual(Qualifier::eq("name", Value::string("Row #4")));
    assert_eq!(ids(&collect(&small_table(5), &query)), vec![4]);
}

// =============================================================================
// Projection Tests
// =============================================================================

/// Requested columns appear exactly, in request order.
#[test]
fn test_projection_selects_columns() {
    let query = QuerySpec::new().with_columns(["name"]);
    let rows = collect(&small_table(5), &query);
    assert_eq!(rows.len(), 10);
    for row in &rows {
        assert_eq!(row.column_names(), vec!["name"]);
    }
}

/// Unknown projected columns get the placeholder value.
#[test]
fn test_unknown_projected_column_placeholder() {
    let query = QuerySpec::new().with_columns(["id", "color"]).with_limit(2);
    let rows = collect(&small_table(5), &query);
    assert_eq!(rows[1].column_names(), vec!["id", "color"]);
    assert_eq!(
        rows[1].get("color"),
        Some(&Value::string("Value for color @ row 2"))
    );
}

/// Filtering works on columns that are not projected.
#[test]
fn test_filter_on_unprojected_column() {
    let query = QuerySpec::new()
        .with_columns(["name"])
        .with_qual(Qualifier::gt("id", Value::int(8)));
    let rows = collect(&small_table(5), &query);
    let names: Vec<_> = rows.iter().map(|r| r.get("name").cloned().unwrap()).collect();
    assert_eq!(names, vec![Value::string("Row #9"), Value::string("Row #10")]);
}

// =============================================================================
// Batching Tests
// =============================================================================

/// Concatenated batches equal the unbatched reference enumeration.
#[test]
fn test_batching_is_transparent() {
    let qual = Qualifier::simple("id", Operator::NotEquals, Value::int(5));
    let query = QuerySpec::new().with_qual(qual);
    let reference: Vec<i64> = (1..=10).filter(|r| *r != 5).collect();

    for batch_size in [1, 2, 3, 4, 7, 9, 10, 11] {
        let table = small_table(batch_size);
        let batches: Vec<_> = table.execute(&query, CancellationToken::new()).collect();
        assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));
        let rows: Vec<Row> = batches.into_iter().flat_map(|b| b.rows).collect();
        assert_eq!(ids(&rows), reference, "batch size {}", batch_size);
    }
}

/// A final short batch is flushed on completion.
#[test]
fn test_partial_final_batch() {
    let sizes: Vec<usize> = small_table(4)
        .execute(&QuerySpec::new(), CancellationToken::new())
        .map(|b| b.len())
        .collect();
    assert_eq!(sizes, vec![4, 4, 2]);
}

// =============================================================================
// Cancellation And Finalization Tests
// =============================================================================

/// Cancelling after K batches stops output and finalizes once.
#[test]
fn test_cancel_after_k_batches() {
    let table = OrdinalTable::unbounded("endless", 5);
    let cancel = CancellationToken::new();
    let (mut stream, count, summary) = observed(table.execute(&QuerySpec::new(), cancel.clone()));

    assert_eq!(stream.next().map(|b| b.len()), Some(5));
    assert_eq!(stream.next().map(|b| b.len()), Some(5));
    cancel.cancel();

    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
    assert_eq!(stream.state(), StreamState::Cancelled);
    drop(stream);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let summary = summary.lock().unwrap().clone().unwrap();
    assert_eq!(summary.outcome, StreamState::Cancelled);
    assert_eq!(summary.rows_emitted, 10);
    assert_eq!(summary.batches_emitted, 2);
    assert!(!summary.closed_by_consumer);
}

/// A token cancelled before the first poll yields nothing.
#[test]
fn test_cancel_before_start() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (stream, count, _) = observed(small_table(5).execute(&QuerySpec::new(), cancel));

    assert_eq!(stream.count(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// Completion finalizes as soon as the last batch is produced.
#[test]
fn test_completion_finalizes_once() {
    let (mut stream, count, summary) =
        observed(small_table(4).execute(&QuerySpec::new(), CancellationToken::new()));

    stream.next();
    stream.next();
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(stream.next().map(|b| b.len()), Some(2));
    assert!(stream.is_finalized());
    assert!(stream.next().is_none());
    stream.close();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let summary = summary.lock().unwrap().clone().unwrap();
    assert_eq!(summary.outcome, StreamState::Completed);
    assert_eq!(summary.rows_emitted, 10);
    assert_eq!(summary.batches_emitted, 3);
}

/// Dropping a stream midway finalizes it as closed by the consumer.
#[test]
fn test_drop_midway_finalizes() {
    let (mut stream, count, summary) =
        observed(small_table(3).execute(&QuerySpec::new(), CancellationToken::new()));
    stream.next();
    drop(stream);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let summary = summary.lock().unwrap().clone().unwrap();
    assert_eq!(summary.outcome, StreamState::Cancelled);
    assert!(summary.closed_by_consumer);
    assert_eq!(summary.rows_emitted, 3);
}

/// A stream that is never polled still finalizes.
#[test]
fn test_never_polled_stream_finalizes() {
    let (stream, count, _) =
        observed(small_table(3).execute(&QuerySpec::new(), CancellationToken::new()));
    stream.close();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// Concurrent streams over one table are independent.
#[test]
fn test_concurrent_streams_are_independent() {
    let table: Arc<dyn Table> = Arc::new(OrdinalTable::new("shared", 1_000, 7));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let table = table.clone();
            std::thread::spawn(move || {
                let query = QuerySpec::new().with_limit(100 * (i + 1));
                table
                    .execute(&query, CancellationToken::new())
                    .map(|b| b.len())
                    .sum::<usize>()
            })
        })
        .collect();

    let totals: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(totals, vec![100, 200, 300, 400]);
}
