//! IntelliCourse API Server
//!
//! REST API server answering questions about the course catalog.

use ic_api::{create_router, state::AppState};
use ic_core::config::{AppConfig, LoggingConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Populate the process environment before reading configuration
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::load(None)?;
    init_tracing(&config.logging);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let addr = config.server.bind_addr();

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);
    if !state.assistant.has_client() {
        tracing::warn!("Starting without a model client; queries with context return a fixed message");
    }

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("IntelliCourse API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}
