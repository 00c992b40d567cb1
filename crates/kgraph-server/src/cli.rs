//! One-shot CLI commands.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use kgraph_ingest::InputSource;
use kgraph_runtime::Orchestrator;

pub fn print_help() {
    println!("kgraph: build a knowledge graph page from a document or text");
    println!();
    println!("Usage: kgraph [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve           Start the web server");
    println!("  generate <file|->        Render a graph from a .pdf/.docx/.txt file or stdin");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  PORT                     HTTP port (default 8501)");
    println!("  KGRAPH_DATA_DIR          Output directory (default .)");
    println!("  KGRAPH_LLM_TIMEOUT_SECS  LLM request timeout (default 120)");
    println!("  OPENAI_API_KEY | ANTHROPIC_API_KEY | GROQ_API_KEY");
}

/// Read a file (or stdin for `-`) into an input source.
pub fn read_input(target: &str) -> anyhow::Result<InputSource> {
    if target == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(InputSource::Text(text));
    }

    let path = Path::new(target);
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", target))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| target.to_string());
    Ok(InputSource::Upload { filename, bytes })
}

/// Generate once and print the summary as JSON. Returns whether a graph was written.
pub fn generate_once(orchestrator: &Orchestrator, source: InputSource) -> anyhow::Result<bool> {
    let Some(generation) = orchestrator.generate_from(source)? else {
        eprintln!("Nothing to generate: the input is empty.");
        return Ok(false);
    };

    println!("{}", serde_json::to_string_pretty(&generation)?);
    if let Some(artifact) = &generation.artifact {
        eprintln!("Knowledge graph written to {}", artifact.path.display());
    }
    Ok(generation.succeeded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use kgraph_extract::{Node, Relationship, StubExtractor};
    use kgraph_render::RenderOptions;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Alice works at Acme.").unwrap();

        match read_input(path.to_str().unwrap()).unwrap() {
            InputSource::Upload { filename, bytes } => {
                assert_eq!(filename, "notes.txt");
                assert_eq!(bytes, b"Alice works at Acme.");
            }
            other => panic!("unexpected source: {:?}", other),
        }
        assert!(read_input(dir.path().join("missing.txt").to_str().unwrap()).is_err());
    }

    #[test]
    fn test_generate_once() {
        let dir = tempfile::tempdir().unwrap();
        let alice = Node::new("Alice", "Person");
        let acme = Node::new("Acme", "Organization");
        let stub = StubExtractor::fixed(
            vec![alice.clone(), acme.clone()],
            vec![Relationship::new(alice, acme, "works_at")],
        );
        let orchestrator = Orchestrator::new(
            Arc::new(stub),
            RenderOptions::new(dir.path().join("knowledge_graph.html")),
        );

        let written = generate_once(
            &orchestrator,
            InputSource::Text("Alice works at Acme.".into()),
        )
        .unwrap();
        assert!(written);
        assert!(dir.path().join("knowledge_graph.html").exists());

        let blank = generate_once(&orchestrator, InputSource::Text("  ".into())).unwrap();
        assert!(!blank);
    }
}
