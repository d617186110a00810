//! IntelliCourse API - REST server
//!
//! Exposes the catalog question-answering pipeline over HTTP:
//! - `POST /api/query` answers a question
//! - `GET /` reports liveness
//! - `GET /docs` serves the Swagger UI

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{http::HeaderValue, routing::get, Router};
use handlers::{health, query};
use state::AppState;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "IntelliCourse AI Assistant API",
        description = "A REST API for querying Northwood University's course catalogs using the Gemini API (RAG)."
    ),
    paths(health::root, query::query_handler),
    components(schemas(
        query::QueryRequest,
        query::QueryResponse,
        health::HealthResponse,
        error::ApiError
    )),
    tags(
        (name = "IntelliCourse", description = "Catalog question answering"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Build the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(health::root))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS policy allowing only the configured origins
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = origin.as_str(), "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
