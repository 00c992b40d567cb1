//! JSON API: POST /api/graph and GET /api/status.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use kgraph_ingest::InputSource;
use serde::Deserialize;
use tracing::error;

use super::{run_generation, status_for};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graph", post(generate_graph))
        .route("/status", get(get_status))
}

#[derive(Debug, Deserialize)]
struct GraphRequest {
    #[serde(default)]
    text: String,
}

/// POST /api/graph: generate from text and return the generation summary.
async fn generate_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphRequest>,
) -> Response {
    match run_generation(&state, InputSource::Text(req.text)).await {
        Ok(Some(generation)) => {
            let status = if generation.succeeded() {
                StatusCode::OK
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(generation)).into_response()
        }
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No input text provided" })),
        )
            .into_response(),
        Err(e) => {
            error!("Generation failed: {}", e);
            (
                status_for(&e),
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /api/status: model, output location and the last generation.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let last = state.last_generation.read().clone();
    let output_file = &state.config.data_paths.output_file;

    Json(serde_json::json!({
        "provider": state.provider,
        "model": state.model(),
        "outputFile": output_file.to_string_lossy(),
        "hasGraph": output_file.exists(),
        "llmTimeoutSecs": state.config.llm_timeout_secs,
        "lastGeneration": last,
    }))
}
