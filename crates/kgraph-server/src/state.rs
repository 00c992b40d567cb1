//! Shared application state.

use std::sync::Arc;

use kgraph_core::AppConfig;
use kgraph_extract::GraphExtractor;
use kgraph_render::RenderOptions;
use kgraph_runtime::{Generation, Orchestrator};
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Orchestrator,
    /// Provider name shown on the status endpoint ("openai", "stub", ...).
    pub provider: String,
    pub last_generation: RwLock<Option<Generation>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        extractor: Arc<dyn GraphExtractor>,
        provider: impl Into<String>,
    ) -> Self {
        let render_options = RenderOptions::new(config.data_paths.output_file.clone());
        Self {
            orchestrator: Orchestrator::new(extractor, render_options),
            config,
            provider: provider.into(),
            last_generation: RwLock::new(None),
        }
    }

    pub fn model(&self) -> String {
        self.orchestrator.extractor().describe()
    }

    pub fn record(&self, generation: &Generation) {
        *self.last_generation.write() = Some(generation.clone());
    }
}
