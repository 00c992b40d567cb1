//! Runtime types.

use kgraph_render::{GraphArtifact, RenderReport};
use serde::Serialize;

/// Result of one generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub request_id: String,
    /// `None` when the page could not be written; see `write_error`.
    pub artifact: Option<GraphArtifact>,
    pub report: RenderReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_error: Option<String>,
    /// Counts as returned by the extractor, before filtering.
    pub extracted_nodes: usize,
    pub extracted_relationships: usize,
    pub elapsed_ms: u64,
}

impl Generation {
    pub fn succeeded(&self) -> bool {
        self.artifact.is_some()
    }
}
