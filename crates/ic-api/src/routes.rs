//! API route definitions

use crate::handlers::query;
use crate::state::AppState;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/query", post(query::query_handler))
}
