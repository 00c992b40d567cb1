//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default HTTP port for the web form.
pub const DEFAULT_PORT: u16 = 8501;

/// Default upper bound for one extraction request.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Name of the rendered graph file, overwritten on every generation.
pub const OUTPUT_FILE_NAME: &str = "knowledge_graph.html";

/// Paths to all kgraph data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (defaults to the working directory).
    pub root: PathBuf,
    /// Rendered graph artifact (`knowledge_graph.html`).
    pub output_file: PathBuf,
    /// Optional LLM configuration (`llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            output_file: root.join(OUTPUT_FILE_NAME),
            llm_config_file: root.join("llm-config.json"),
            root,
        })
    }
}

/// Top-level kgraph configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Timeout applied to each LLM extraction request, in seconds.
    pub llm_timeout_secs: u64,
}

impl AppConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let llm_timeout_secs = match std::env::var("KGRAPH_LLM_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw).unwrap_or_else(|| {
                warn!(
                    "Ignoring KGRAPH_LLM_TIMEOUT_SECS={:?}; using {}s",
                    raw, DEFAULT_LLM_TIMEOUT_SECS
                );
                DEFAULT_LLM_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_LLM_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            data_paths: DataPaths::new(data_dir)?,
            llm_timeout_secs,
        })
    }

    /// Configuration with defaults only, rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            port: DEFAULT_PORT,
            data_paths: DataPaths::new(data_dir)?,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

/// Parse a positive number of seconds; zero is rejected.
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}
