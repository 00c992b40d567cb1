//! Graph extraction with an external LLM (OpenAI/Anthropic/Groq).
//!
//! The model is asked for the entities (nodes) and relationships in a text
//! and its JSON reply is normalized into a `GraphDocument`. Calls are plain
//! blocking request/response with a timeout; callers on an async runtime run
//! them on the blocking pool.

pub mod config;
pub mod extractor;
pub mod parse;
pub mod prompt;
pub mod providers;
pub mod types;

pub use config::{LLMConfig, ProviderSelection};
pub use extractor::{GraphExtractor, LlmGraphExtractor, StubExtractor};
pub use parse::ExtractedGraph;
pub use types::*;
