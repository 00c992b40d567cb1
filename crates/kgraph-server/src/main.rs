//! kgraph: knowledge graph from text, single binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use kgraph_core::AppConfig;
use kgraph_extract::{LLMConfig, LlmGraphExtractor};
use kgraph_server::{cli, routes, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("KGRAPH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        None | Some("serve") | Some("generate") => {}
        Some("--help") | Some("-h") | Some("help") => {
            cli::print_help();
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'kgraph help' for usage.", other);
            std::process::exit(1);
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = AppConfig::from_env(&data_dir).context("Failed to prepare data directory")?;
    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let selection = llm_config.require_provider()?;
    let extractor = LlmGraphExtractor::from_config(&llm_config, config.llm_timeout())?;

    let state = Arc::new(AppState::new(
        config,
        Arc::new(extractor),
        selection.provider.to_string(),
    ));

    if command == Some("generate") {
        let Some(target) = args.get(2) else {
            eprintln!("Usage: kgraph generate <file|->");
            std::process::exit(1);
        };
        let source = cli::read_input(target)?;
        let written = cli::generate_once(&state.orchestrator, source)?;
        std::process::exit(if written { 0 } else { 1 });
    }

    serve(state.clone())?;

    // `state` still holds the blocking HTTP client; it must be dropped
    // outside the async runtime.
    drop(state);
    Ok(())
}

fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let port = state.config.port;
        let app = routes::build_router(state);

        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("kgraph server listening on http://{}", addr);

        axum::serve(listener, app).await?;
        Ok(())
    })
}
