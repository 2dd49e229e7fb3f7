//! Facade errors
//!
//! Maps the core error taxonomy onto HTTP statuses plus a gRPC-style status
//! name carried in the body.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DasError;

/// Result type for facade handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// A per-call failure returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DasError);

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            // 404 Not Found
            DasError::InstanceNotFound(_) => StatusCode::NOT_FOUND,

            // 400 Bad Request
            DasError::TableNotFound(_) => StatusCode::BAD_REQUEST,
            DasError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DasError::UnsupportedType(_) => StatusCode::BAD_REQUEST,

            // 501 Not Implemented
            DasError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,

            // 500 Internal Server Error
            DasError::Construction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DasError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// RPC status name for this error
    pub fn status_name(&self) -> &'static str {
        match self.status_code() {
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::BAD_REQUEST => "INVALID_ARGUMENT",
            StatusCode::NOT_IMPLEMENTED => "UNIMPLEMENTED",
            _ => "INTERNAL",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DasError::InvalidArgument(rejection.body_text()))
    }
}

/// JSON body extractor whose rejections use the error envelope
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
    pub code: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_name().to_string(),
            code: err.0.code().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = ApiError(DasError::InstanceNotFound("x".into()));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.status_name(), "NOT_FOUND");

        let table = ApiError(DasError::TableNotFound("t".into()));
        assert_eq!(table.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(table.status_name(), "INVALID_ARGUMENT");

        let unsupported = ApiError(DasError::unsupported("Insert"));
        assert_eq!(unsupported.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(unsupported.status_name(), "UNIMPLEMENTED");

        let internal = ApiError(DasError::internal("Lock poisoned"));
        assert_eq!(internal.status_name(), "INTERNAL");
    }

    #[test]
    fn test_body_keeps_message_text() {
        let err = ApiError::from(DasError::TableNotFound("missing".into()));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, "Unknown table: missing");
        assert_eq!(body.status, "INVALID_ARGUMENT");
        assert_eq!(body.code, "DAS_NOT_FOUND");
    }
}
