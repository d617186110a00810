//! RAG query handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

/// Query request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// User's question about the catalog
    #[schema(example = "What are the prerequisites for CS 201?")]
    pub user_query: String,
}

/// Query response body
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    /// Generated answer, or a fixed message when none could be generated
    #[schema(example = "CS 201 requires CS 101.")]
    pub answer: String,
}

/// Answer a question from the course catalog
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "IntelliCourse",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer produced", body = QueryResponse),
        (status = 422, description = "Malformed request body", body = crate::error::ApiError),
        (status = 500, description = "Unhandled error", body = crate::error::ApiError)
    )
)]
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(req) = payload?;
    let start = Instant::now();

    let answer = state.assistant.answer(&req.user_query).await;

    tracing::info!(
        query_chars = req.user_query.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Query answered"
    );

    Ok(Json(QueryResponse { answer }))
}
