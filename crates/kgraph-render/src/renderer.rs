//! Graph renderer: filter extracted relationships, build the network, write the page.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kgraph_core::{Error, Result};
use kgraph_extract::{GraphDocument, Node, Relationship};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::html;
use crate::network::{Network, NetworkOptions};
use crate::physics::PhysicsOptions;

/// Where and how to render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output page, overwritten on every render.
    pub output_file: PathBuf,
    pub network: NetworkOptions,
    pub physics: PhysicsOptions,
}

impl RenderOptions {
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            network: NetworkOptions::default(),
            physics: PhysicsOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Node,
    Edge,
}

/// A node or edge that could not be added to the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub kind: ItemKind,
    pub id: String,
    pub reason: String,
}

/// What happened to the extracted items during one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub relationships_total: usize,
    pub relationships_retained: usize,
    /// Relationships dropped because an endpoint is not a declared node.
    pub relationships_dropped: usize,
    /// Declared nodes with no retained relationship; these are not drawn.
    pub isolated_nodes: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
    pub skipped: Vec<SkippedItem>,
}

/// Handle to a written graph page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphArtifact {
    pub path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
    /// SHA-256 of the network's structural content (nodes, edges, options).
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of `render`. `artifact` is `None` when the page could not be written.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub artifact: Option<GraphArtifact>,
    pub report: RenderReport,
    pub write_error: Option<String>,
}

/// Build the network for a document, recording every dropped or skipped item.
///
/// Only nodes referenced by at least one retained relationship are added,
/// in order of first reference.
pub fn build_network(
    doc: &GraphDocument,
    network_options: &NetworkOptions,
    physics: &PhysicsOptions,
) -> (Network, RenderReport) {
    let mut report = RenderReport {
        relationships_total: doc.relationships.len(),
        ..Default::default()
    };

    // Last declaration of an ID wins.
    let mut node_map: HashMap<&str, &Node> = HashMap::with_capacity(doc.nodes.len());
    for node in &doc.nodes {
        node_map.insert(node.id.as_str(), node);
    }

    let mut retained: Vec<&Relationship> = Vec::new();
    let mut referenced: Vec<&str> = Vec::new();
    let mut referenced_set: HashSet<&str> = HashSet::new();
    for rel in &doc.relationships {
        let source = rel.source.id.as_str();
        let target = rel.target.id.as_str();
        if node_map.contains_key(source) && node_map.contains_key(target) {
            retained.push(rel);
            for id in [source, target] {
                if referenced_set.insert(id) {
                    referenced.push(id);
                }
            }
        } else {
            report.relationships_dropped += 1;
        }
    }
    report.relationships_retained = retained.len();
    report.isolated_nodes = node_map.len() - referenced_set.len();

    if report.relationships_dropped > 0 {
        warn!(
            "Dropped {} of {} relationships referencing undeclared nodes",
            report.relationships_dropped, report.relationships_total
        );
    }

    let mut network = Network::new(network_options.clone());

    for id in referenced {
        let node = node_map[id];
        match network.add_node(&node.id, &node.id, &node.node_type, &node.node_type) {
            Ok(_) => report.nodes_added += 1,
            Err(e) => {
                warn!("Skipping node '{}': {}", node.id, e);
                report.skipped.push(SkippedItem {
                    kind: ItemKind::Node,
                    id: node.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for rel in retained {
        let label = rel.rel_type.to_lowercase();
        match network.add_edge(&rel.source.id, &rel.target.id, &label) {
            Ok(()) => report.edges_added += 1,
            Err(e) => {
                let id = format!("{} -[{}]-> {}", rel.source.id, label, rel.target.id);
                warn!("Skipping edge {}: {}", id, e);
                report.skipped.push(SkippedItem {
                    kind: ItemKind::Edge,
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    network.set_physics(physics.clone());
    (network, report)
}

/// Render a document to the output page, overwriting any previous page.
pub fn render(doc: &GraphDocument, options: &RenderOptions) -> Rendered {
    let (network, report) = build_network(doc, &options.network, &options.physics);

    match write_page(&network, &options.output_file) {
        Ok(()) => {
            let path = std::fs::canonicalize(&options.output_file).unwrap_or_else(|e| {
                debug!(
                    "Could not resolve absolute path of {}: {}",
                    options.output_file.display(),
                    e
                );
                options.output_file.clone()
            });
            info!("Graph saved to {}", path.display());
            Rendered {
                artifact: Some(GraphArtifact {
                    path,
                    node_count: network.node_count(),
                    edge_count: network.edge_count(),
                    fingerprint: fingerprint(&network),
                    generated_at: Utc::now(),
                }),
                report,
                write_error: None,
            }
        }
        Err(e) => {
            error!("Error saving graph: {}", e);
            Rendered {
                artifact: None,
                report,
                write_error: Some(e.to_string()),
            }
        }
    }
}

fn write_page(network: &Network, path: &Path) -> Result<()> {
    let page = html::to_html(network)?;
    std::fs::write(path, page).map_err(|e| Error::Render(format!("{}: {}", path.display(), e)))
}

/// Structural digest of the network, stable across renders of the same document.
pub fn fingerprint(network: &Network) -> String {
    let mut hasher = Sha256::new();
    hasher.update(network.to_json().to_string().as_bytes());
    hex::encode(hasher.finalize())
}
