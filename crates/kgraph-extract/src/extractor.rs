//! Graph extractor trait and implementations.
//!
//! - `LlmGraphExtractor`: prompts a `CompletionBackend` and parses the reply
//! - `StubExtractor`: canned results, for tests and offline runs

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kgraph_core::{Error, Result};
use parking_lot::Mutex;
use tracing::info;

use crate::config::LLMConfig;
use crate::parse::{self, ExtractedGraph};
use crate::prompt::PromptTemplate;
use crate::providers::{CompletionBackend, CompletionRequest, HttpCompletionBackend};
use crate::types::{Document, GraphDocument, Node, Relationship};

/// Turns text into a `GraphDocument`. One blocking call per document.
pub trait GraphExtractor: Send + Sync {
    /// Extract nodes and relationships from one document.
    fn extract_document(&self, document: Document) -> Result<GraphDocument>;

    /// Wrap `text` into a single document and extract from it.
    fn extract(&self, text: &str) -> Result<GraphDocument> {
        self.extract_document(Document::new(text))
    }

    /// Human-readable description of the backing model.
    fn describe(&self) -> String;
}

/// Extractor backed by an external LLM.
pub struct LlmGraphExtractor {
    backend: Arc<dyn CompletionBackend>,
    prompt: PromptTemplate,
    temperature: f64,
}

impl LlmGraphExtractor {
    /// Build the HTTP-backed extractor. A missing credential is a `Config` error.
    pub fn from_config(config: &LLMConfig, timeout: Duration) -> Result<Self> {
        let selection = config.require_provider()?;
        info!(
            "LLM extractor: provider={}, model={}, timeout={}s",
            selection.provider,
            selection.model,
            timeout.as_secs()
        );
        let backend = HttpCompletionBackend::new(selection, timeout)?;
        Ok(Self::with_backend(Arc::new(backend), config.temperature))
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>, temperature: f64) -> Self {
        Self {
            backend,
            prompt: PromptTemplate::default(),
            temperature,
        }
    }
}

impl GraphExtractor for LlmGraphExtractor {
    fn extract_document(&self, document: Document) -> Result<GraphDocument> {
        let start = Instant::now();
        let (system, user) = self.prompt.build(&document.page_content);
        let reply = self.backend.complete(&CompletionRequest {
            system,
            user,
            temperature: self.temperature,
        })?;

        let ExtractedGraph {
            nodes,
            relationships,
        } = parse::parse_reply(&reply)?;

        info!(
            nodes = nodes.len(),
            relationships = relationships.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(GraphDocument::new(nodes, relationships, document))
    }

    fn describe(&self) -> String {
        self.backend.model().to_string()
    }
}

/// Extractor returning canned graphs. Queued results are served first, then
/// the fixed result if one is set; with neither, extraction fails.
#[derive(Clone, Default)]
pub struct StubExtractor {
    queued: Arc<Mutex<VecDeque<Result<ExtractedGraph>>>>,
    fixed: Option<ExtractedGraph>,
}

impl StubExtractor {
    /// Always return the same nodes and relationships.
    pub fn fixed(nodes: Vec<Node>, relationships: Vec<Relationship>) -> Self {
        Self {
            queued: Arc::default(),
            fixed: Some(ExtractedGraph {
                nodes,
                relationships,
            }),
        }
    }

    pub fn push(&self, nodes: Vec<Node>, relationships: Vec<Relationship>) {
        self.queued.lock().push_back(Ok(ExtractedGraph {
            nodes,
            relationships,
        }));
    }

    /// Queue a failure, as an unreachable or misbehaving provider would produce.
    pub fn push_error(&self, error: Error) {
        self.queued.lock().push_back(Err(error));
    }
}

impl GraphExtractor for StubExtractor {
    fn extract_document(&self, document: Document) -> Result<GraphDocument> {
        let next = self.queued.lock().pop_front();
        let graph = match next {
            Some(result) => result?,
            None => self
                .fixed
                .clone()
                .ok_or_else(|| Error::Llm("no stub response available".into()))?,
        };
        Ok(GraphDocument::new(graph.nodes, graph.relationships, document))
    }

    fn describe(&self) -> String {
        "stub".into()
    }
}
