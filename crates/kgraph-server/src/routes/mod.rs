//! HTTP route handlers: the form page, the graph artifact and the JSON API.

pub mod api;
pub mod form;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::Router;
use kgraph_core::{Error, Result};
use kgraph_ingest::InputSource;
use kgraph_runtime::Generation;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted request body (uploads included).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(form::routes())
        .nest("/api", api::routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run one generation on the blocking pool and remember its summary.
pub(crate) async fn run_generation(
    state: &Arc<AppState>,
    source: InputSource,
) -> Result<Option<Generation>> {
    let worker = state.clone();
    let generation =
        tokio::task::spawn_blocking(move || worker.orchestrator.generate_from(source))
            .await
            .map_err(|e| Error::Internal(format!("generation task failed: {}", e)))??;

    if let Some(generation) = &generation {
        state.record(generation);
    }
    Ok(generation)
}

/// HTTP status for a failed generation.
pub(crate) fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Input(_) => StatusCode::BAD_REQUEST,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Llm(_) | Error::Http(_) | Error::Parse(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
