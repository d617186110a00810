//! Health check handler

use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "IntelliCourse API is running! Access /docs for the interface.";

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "IntelliCourse API is running! Access /docs for the interface.")]
    pub message: String,
}

/// Liveness message, independent of catalog and credential state
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn root() -> impl IntoResponse {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}
