//! Runtime orchestrator: runs the extractor then the renderer for one input.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;
