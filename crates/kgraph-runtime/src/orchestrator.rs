//! Orchestrator: Collector, then Extractor, then Renderer, in sequence.

use std::sync::Arc;
use std::time::Instant;

use kgraph_core::Result;
use kgraph_extract::{Document, GraphExtractor};
use kgraph_ingest::InputSource;
use kgraph_render::RenderOptions;
use tracing::{info, info_span, warn};

use crate::types::Generation;

/// Runs one generation at a time for the caller. No retries.
pub struct Orchestrator {
    extractor: Arc<dyn GraphExtractor>,
    render_options: RenderOptions,
}

impl Orchestrator {
    pub fn new(extractor: Arc<dyn GraphExtractor>, render_options: RenderOptions) -> Self {
        Self {
            extractor,
            render_options,
        }
    }

    pub fn extractor(&self) -> &Arc<dyn GraphExtractor> {
        &self.extractor
    }

    /// Extract a graph from `text` and render it to the output page.
    ///
    /// Extraction failures are returned as errors. A page that cannot be
    /// written yields a `Generation` without an artifact.
    pub fn generate(&self, text: &str) -> Result<Generation> {
        self.generate_document(Document::new(text).with_metadata("source", "text"))
    }

    /// Collect input, then generate. Returns `Ok(None)` when there is no input yet.
    pub fn generate_from(&self, source: InputSource) -> Result<Option<Generation>> {
        let kind = source.kind();
        let filename = source.filename().map(str::to_string);

        let Some(text) = kgraph_ingest::collect(source)? else {
            info!("No input provided; nothing to generate");
            return Ok(None);
        };

        let mut document = Document::new(text).with_metadata(
            "source",
            match kind {
                kgraph_ingest::InputKind::Upload => "upload",
                kgraph_ingest::InputKind::Text => "text",
            },
        );
        if let Some(name) = filename {
            document = document.with_metadata("filename", name);
        }
        self.generate_document(document).map(Some)
    }

    fn generate_document(&self, document: Document) -> Result<Generation> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("generate", request_id = %request_id);
        let _guard = span.enter();

        let start = Instant::now();
        info!("Extracting graph from {} chars", document.page_content.chars().count());

        let graph_doc = self.extractor.extract_document(document)?;
        if graph_doc.is_empty() {
            warn!("Extractor found no nodes or relationships; rendering an empty graph");
        }
        let extracted_nodes = graph_doc.nodes.len();
        let extracted_relationships = graph_doc.relationships.len();

        let rendered = kgraph_render::render(&graph_doc, &self.render_options);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            nodes = rendered.report.nodes_added,
            edges = rendered.report.edges_added,
            skipped = rendered.report.skipped.len(),
            written = rendered.artifact.is_some(),
            elapsed_ms,
            "Generation finished"
        );

        Ok(Generation {
            request_id,
            artifact: rendered.artifact,
            report: rendered.report,
            write_error: rendered.write_error,
            extracted_nodes,
            extracted_relationships,
            elapsed_ms,
        })
    }
}
