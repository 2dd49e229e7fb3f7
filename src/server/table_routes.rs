//! Table routes
//!
//! Every call resolves the instance, then the table, before touching
//! either. Execute streams one JSON-encoded `RowBatch` per line.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::catalog::Table;
use crate::error::{DasError, DasResult};
use crate::executor::{RowStream, StreamState};
use crate::observability::{Event, Logger};
use crate::schema::RowBatch;

use super::errors::{ApiError, ApiJson, ApiResult};
use super::messages::{
    Ack, BulkInsertRequest, BulkInsertSizeResponse, DasIdRequest, DefinitionsResponse,
    DeleteRequest, EstimateRequest, EstimateResponse, ExplainResponse, InsertRequest,
    PathKeysResponse, QueryRequest, RowResponse, RowsResponse, SortOrdersRequest,
    SortOrdersResponse, TableRef, UniqueColumnResponse, UpdateRequest,
};
use super::server::AppState;

/// Content type of the execute response body
pub const NDJSON: &str = "application/x-ndjson";

/// Create table routes
pub fn table_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/definitions", post(definitions_handler))
        .route("/sort-orders", post(sort_orders_handler))
        .route("/path-keys", post(path_keys_handler))
        .route("/estimate", post(estimate_handler))
        .route("/explain", post(explain_handler))
        .route("/execute", post(execute_handler))
        .route("/unique-column", post(unique_column_handler))
        .route("/bulk-insert-size", post(bulk_insert_size_handler))
        .route("/insert", post(insert_handler))
        .route("/bulk-insert", post(bulk_insert_handler))
        .route("/update", post(update_handler))
        .route("/delete", post(delete_handler))
        .with_state(state)
}

// ==================
// Resolution
// ==================

/// Resolves instance then table, logging and counting lookup failures
fn resolve_table(state: &AppState, target: &TableRef, call: &str) -> ApiResult<Arc<dyn Table>> {
    state.metrics.increment_table_calls();
    Logger::trace(
        Event::TableCall.as_str(),
        &[
            ("call", call),
            ("das_id", target.das_id.as_str()),
            ("table_id", target.table_id.as_str()),
        ],
    );

    let instance = state.registry.resolve(&target.das_id).map_err(|err| {
        not_found(state, &err, target);
        err
    })?;

    instance.table(&target.table_id).map_err(|err| {
        not_found(state, &err, target);
        ApiError::from(err)
    })
}

fn not_found(state: &AppState, err: &DasError, target: &TableRef) {
    let event = match err {
        DasError::InstanceNotFound(_) => Event::DasNotFound,
        DasError::TableNotFound(_) => Event::TableNotFound,
        _ => return,
    };
    state.metrics.increment_not_found();
    Logger::warn(
        event.as_str(),
        &[
            ("das_id", target.das_id.as_str()),
            ("table_id", target.table_id.as_str()),
        ],
    );
}

/// Counts and logs mutations the table does not offer
fn mutation<T>(state: &AppState, target: &TableRef, result: DasResult<T>) -> ApiResult<T> {
    result.map_err(|err| {
        if let DasError::Unsupported(operation) = &err {
            state.metrics.increment_mutations_rejected();
            Logger::info(
                Event::MutationUnsupported.as_str(),
                &[
                    ("operation", operation.as_str()),
                    ("table_id", target.table_id.as_str()),
                ],
            );
        }
        ApiError::from(err)
    })
}

// ==================
// Metadata
// ==================

async fn definitions_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DasIdRequest>,
) -> ApiResult<Json<DefinitionsResponse>> {
    state.metrics.increment_table_calls();
    let instance = state.registry.resolve(&req.das_id).map_err(|err| {
        state.metrics.increment_not_found();
        Logger::warn(Event::DasNotFound.as_str(), &[("das_id", req.das_id.as_str())]);
        err
    })?;
    Ok(Json(DefinitionsResponse {
        definitions: instance.definitions(),
    }))
}

async fn sort_orders_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SortOrdersRequest>,
) -> ApiResult<Json<SortOrdersResponse>> {
    let table = resolve_table(&state, &req.table, "sort_orders")?;
    Ok(Json(SortOrdersResponse {
        sort_keys: table.sort_orders(&req.sort_keys),
    }))
}

async fn path_keys_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TableRef>,
) -> ApiResult<Json<PathKeysResponse>> {
    let table = resolve_table(&state, &req, "path_keys")?;
    Ok(Json(PathKeysResponse {
        path_keys: table.path_keys(),
    }))
}

async fn estimate_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EstimateRequest>,
) -> ApiResult<Json<EstimateResponse>> {
    let table = resolve_table(&state, &req.table, "estimate")?;
    Ok(Json(table.estimate(&req.quals, &req.columns)))
}

async fn explain_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<QueryRequest>,
) -> ApiResult<Json<ExplainResponse>> {
    let table = resolve_table(&state, &req.table, "explain")?;
    Ok(Json(ExplainResponse {
        stmts: table.explain(&req.query),
    }))
}

async fn unique_column_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TableRef>,
) -> ApiResult<Json<UniqueColumnResponse>> {
    let table = resolve_table(&state, &req, "unique_column")?;
    Ok(Json(UniqueColumnResponse {
        column: table.unique_column().to_string(),
    }))
}

async fn bulk_insert_size_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TableRef>,
) -> ApiResult<Json<BulkInsertSizeResponse>> {
    let table = resolve_table(&state, &req, "bulk_insert_size")?;
    Ok(Json(BulkInsertSizeResponse {
        size: table.bulk_insert_size(),
    }))
}

// ==================
// Execution
// ==================

/// Starts an execution and streams its batches.
///
/// The response body owns a drop guard of the call's token, so a client
/// that goes away cancels the stream.
async fn execute_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<QueryRequest>,
) -> ApiResult<Response> {
    let table = resolve_table(&state, &req.table, "execute")?;

    let limit = req
        .query
        .limit
        .map(|l| l.to_string())
        .unwrap_or_else(|| "none".to_string());
    Logger::info(
        Event::ExecuteBegin.as_str(),
        &[
            ("das_id", req.table.das_id.as_str()),
            ("limit", limit.as_str()),
            ("table_id", req.table.table_id.as_str()),
        ],
    );
    state.metrics.increment_executions_started();

    let cancel = CancellationToken::new();
    let metrics = state.metrics.clone();
    let rows = table
        .execute(&req.query, cancel.clone())
        .on_finalize(move |summary| {
            metrics.record_stream(
                summary.outcome == StreamState::Cancelled,
                summary.batches_emitted,
                summary.rows_emitted,
            );
        });

    let (tx, rx) = mpsc::channel::<RowBatch>(state.config.stream_buffer.max(1));
    let producer_cancel = cancel.clone();
    tokio::task::spawn_blocking(move || relay_batches(rows, tx, producer_cancel));

    let guard = cancel.drop_guard();
    let body = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let batch = rx.recv().await?;
        Some((encode_line(&batch), (rx, guard)))
    });

    Ok(([(header::CONTENT_TYPE, NDJSON)], Body::from_stream(body)).into_response())
}

/// Drives `rows` on a blocking worker, forwarding each batch.
///
/// Stops when the stream ends, the token is cancelled, or the receiving
/// side is gone; the stream is closed on every path.
fn relay_batches(mut rows: RowStream, tx: mpsc::Sender<RowBatch>, cancel: CancellationToken) {
    let mut consumer_gone = false;
    for batch in rows.by_ref() {
        if tx.blocking_send(batch).is_err() {
            consumer_gone = true;
            break;
        }
    }

    // A consumer leaving after the final batch does not undo completion
    let cancelled = match rows.state() {
        StreamState::Cancelled => true,
        StreamState::Completed => false,
        _ => consumer_gone,
    };
    if cancelled {
        cancel.cancel();
        let emitted = rows.rows_emitted().to_string();
        Logger::info(
            Event::StreamCancelled.as_str(),
            &[("rows_emitted", emitted.as_str()), ("table", rows.table())],
        );
    }
    rows.close();
}

fn encode_line(batch: &RowBatch) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(batch)?;
    line.push(b'\n');
    Ok(line)
}

// ==================
// Mutations
// ==================

async fn insert_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<InsertRequest>,
) -> ApiResult<Json<RowResponse>> {
    let table = resolve_table(&state, &req.table, "insert")?;
    let row = mutation(&state, &req.table, table.insert(&req.row))?;
    Ok(Json(RowResponse { row }))
}

async fn bulk_insert_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BulkInsertRequest>,
) -> ApiResult<Json<RowsResponse>> {
    let table = resolve_table(&state, &req.table, "bulk_insert")?;
    let rows = mutation(&state, &req.table, table.bulk_insert(&req.rows))?;
    Ok(Json(RowsResponse { rows }))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdateRequest>,
) -> ApiResult<Json<RowResponse>> {
    let table = resolve_table(&state, &req.table, "update")?;
    let row = mutation(&state, &req.table, table.update(&req.row_id, &req.new_row))?;
    Ok(Json(RowResponse { row }))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DeleteRequest>,
) -> ApiResult<Json<Ack>> {
    let table = resolve_table(&state, &req.table, "delete")?;
    mutation(&state, &req.table, table.delete(&req.row_id))?;
    Ok(Json(Ack {}))
}
