//! Form page routes: GET /, POST /generate and GET /graph.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use kgraph_core::Error;
use kgraph_ingest::InputSource;
use tracing::{error, warn};

use super::{run_generation, status_for};
use crate::page::{self, Banner, InputMode, PageView};
use crate::state::AppState;

const SUCCESS_MESSAGE: &str = "Knowledge graph generated successfully!";
const FAILURE_MESSAGE: &str = "Failed to generate the knowledge graph. Please try again.";
const SAVE_FAILURE_MESSAGE: &str = "The knowledge graph could not be saved.";
const NO_INPUT_MESSAGE: &str = "Upload a file or enter some text first.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/graph", get(graph))
}

/// GET /: the empty form.
async fn index() -> Html<String> {
    Html(page::render(&PageView::default()))
}

/// Fields of the multipart form.
#[derive(Default)]
struct FormInput {
    mode: InputMode,
    upload: Option<(String, Vec<u8>)>,
    text: String,
}

impl FormInput {
    /// The input for the selected mode, or `None` if no file was chosen.
    fn source(&self) -> Option<InputSource> {
        match self.mode {
            InputMode::Upload => self.upload.as_ref().map(|(filename, bytes)| InputSource::Upload {
                filename: filename.clone(),
                bytes: bytes.clone(),
            }),
            InputMode::Text => Some(InputSource::Text(self.text.clone())),
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<FormInput, String> {
    let mut input = FormInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(e.to_string()),
        };
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "mode" => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                input.mode = InputMode::parse(&value);
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                // Browsers send an empty part when no file is chosen.
                if !filename.is_empty() {
                    input.upload = Some((filename, bytes.to_vec()));
                }
            }
            "text" => {
                input.text = field.text().await.map_err(|e| e.to_string())?;
            }
            _ => {}
        }
    }
    Ok(input)
}

fn page_response(status: StatusCode, view: &PageView) -> Response {
    (status, Html(page::render(view))).into_response()
}

/// POST /generate: run the pipeline and show the result below the form.
async fn generate(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!("Malformed form submission: {}", e);
            let view = PageView {
                banner: Some(Banner::error(FAILURE_MESSAGE)),
                ..Default::default()
            };
            return page_response(StatusCode::BAD_REQUEST, &view);
        }
    };

    let mut view = PageView {
        mode: form.mode,
        text: form.text.clone(),
        ..Default::default()
    };

    let Some(source) = form.source() else {
        view.banner = Some(Banner::warning(NO_INPUT_MESSAGE));
        return page_response(StatusCode::BAD_REQUEST, &view);
    };

    match run_generation(&state, source).await {
        Ok(Some(generation)) => match &generation.artifact {
            Some(_) => {
                view.banner = Some(Banner::success(SUCCESS_MESSAGE));
                view.graph_src = Some(format!("/graph?v={}", generation.request_id));
                page_response(StatusCode::OK, &view)
            }
            None => {
                view.banner = Some(Banner::error(SAVE_FAILURE_MESSAGE));
                page_response(StatusCode::INTERNAL_SERVER_ERROR, &view)
            }
        },
        Ok(None) => {
            view.banner = Some(Banner::warning(NO_INPUT_MESSAGE));
            page_response(StatusCode::BAD_REQUEST, &view)
        }
        Err(Error::Input(message)) => {
            view.banner = Some(Banner::error(message));
            page_response(StatusCode::BAD_REQUEST, &view)
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            view.banner = Some(Banner::error(FAILURE_MESSAGE));
            page_response(status_for(&e), &view)
        }
    }
}

/// GET /graph: the most recently written graph page.
async fn graph(State(state): State<Arc<AppState>>) -> Response {
    let path = &state.config.data_paths.output_file;
    match tokio::fs::read_to_string(path).await {
        Ok(body) => ([(header::CACHE_CONTROL, "no-store")], Html(body)).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "No knowledge graph has been generated yet.",
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read the knowledge graph.").into_response()
        }
    }
}
