//! Registration routes
//!
//! Register reports unsupported kinds and construction failures in-band;
//! only unexpected failures become error statuses.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::error::DasError;
use crate::observability::{Event, Logger};

use super::errors::{ApiJson, ApiResult};
use super::messages::{Ack, DasIdRequest, RegisterRequest, RegisterResponse};
use super::server::AppState;

/// Create registration routes
pub fn registration_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/unregister", post(unregister_handler))
        .with_state(state)
}

async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let kind = req.definition.kind.as_str();
    let requested = req.id.as_deref().unwrap_or("");
    Logger::trace(
        Event::RegisterReceived.as_str(),
        &[("kind", kind), ("requested_id", requested)],
    );

    match state
        .registry
        .register(kind, &req.definition.options, req.id.as_deref())
    {
        Ok(registration) => {
            if registration.is_created() {
                state.metrics.increment_registered();
            } else {
                state.metrics.increment_reused();
            }
            Ok(Json(RegisterResponse::registered(registration.id())))
        }
        Err(err @ (DasError::UnsupportedType(_) | DasError::Construction(_))) => {
            state.metrics.increment_rejected();
            let message = err.to_string();
            Logger::warn(
                Event::DasRegisterRejected.as_str(),
                &[("code", err.code()), ("error", message.as_str()), ("kind", kind)],
            );
            Ok(Json(RegisterResponse::rejected(message)))
        }
        Err(err) => Err(err.into()),
    }
}

async fn unregister_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DasIdRequest>,
) -> ApiResult<Json<Ack>> {
    state.registry.unregister(&req.das_id).map_err(|err| {
        if err.is_not_found() {
            state.metrics.increment_not_found();
            Logger::warn(Event::DasNotFound.as_str(), &[("das_id", req.das_id.as_str())]);
        }
        err
    })?;
    state.metrics.increment_unregistered();
    Ok(Json(Ack {}))
}
