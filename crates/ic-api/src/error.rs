//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error detail
    #[schema(example = "Failed to deserialize the JSON body into the target type")]
    pub detail: String,
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be parsed into the expected schema
    ///
    /// Always reported as 422, whatever the rejection kind.
    InvalidBody(JsonRejection),
    /// Unhandled failure during request handling
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::InvalidBody(rejection) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(rejection.body_text()),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(msg)),
        };

        (status, Json(error)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

/// Convert a panic inside a handler into a 500 response carrying its message
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown internal error".to_string()
    };

    tracing::error!(detail = detail.as_str(), "Request handler panicked");
    AppError::Internal(detail).into_response()
}
