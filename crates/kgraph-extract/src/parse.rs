//! Parsing and normalization of the model's JSON reply.

use kgraph_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::types::{Node, Relationship};

/// Type given to relationship endpoints the model left untyped.
pub const FALLBACK_NODE_TYPE: &str = "Node";

/// Nodes and relationships parsed from one model reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedGraph {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

/// Either list may be missing or `null`; both mean empty.
#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Option<Vec<RawNode>>,
    #[serde(default)]
    relationships: Option<Vec<RawRelationship>>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Value,
    #[serde(default, rename = "type")]
    node_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelationship {
    #[serde(default)]
    source_node_id: Value,
    #[serde(default)]
    source_node_type: Option<String>,
    #[serde(default)]
    target_node_id: Value,
    #[serde(default)]
    target_node_type: Option<String>,
    #[serde(default, rename = "type")]
    rel_type: Option<String>,
}

/// Alternate reply shape: a bare list of head/relation/tail triples.
#[derive(Debug, Deserialize)]
struct RawTriple {
    #[serde(default)]
    head: Value,
    #[serde(default)]
    head_type: Option<String>,
    #[serde(default)]
    relation: Option<String>,
    #[serde(default)]
    tail: Value,
    #[serde(default)]
    tail_type: Option<String>,
}

/// Parse a model reply into normalized nodes and relationships.
///
/// A reply with no JSON at all is a `Parse` error. A JSON object without the
/// expected keys yields an empty graph.
pub fn parse_reply(reply: &str) -> Result<ExtractedGraph> {
    let value = extract_json_from_text(reply)?;

    if value.is_array() {
        let triples: Vec<RawTriple> = serde_json::from_value(value)
            .map_err(|e| Error::Parse(format!("unexpected triple list: {}", e)))?;
        return Ok(from_triples(triples));
    }

    let raw: RawGraph = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("unexpected graph JSON: {}", e)))?;
    Ok(from_raw_graph(raw))
}

fn from_raw_graph(raw: RawGraph) -> ExtractedGraph {
    let nodes: Vec<Node> = raw
        .nodes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| {
            let id = id_string(&n.id)?;
            Some(Node::new(
                title_case(&id),
                capitalize(n.node_type.as_deref().unwrap_or(FALLBACK_NODE_TYPE)),
            ))
        })
        .collect();

    let declared_type = |id: &str| -> Option<String> {
        nodes.iter().find(|n| n.id == id).map(|n| n.node_type.clone())
    };

    let raw_relationships = raw.relationships.unwrap_or_default();
    let mut relationships = Vec::with_capacity(raw_relationships.len());
    for rel in raw_relationships {
        let (Some(source_id), Some(target_id), Some(rel_type)) = (
            id_string(&rel.source_node_id),
            id_string(&rel.target_node_id),
            rel.rel_type.filter(|t| !t.trim().is_empty()),
        ) else {
            debug!("Skipping incomplete relationship in model reply");
            continue;
        };

        let source_id = title_case(&source_id);
        let target_id = title_case(&target_id);
        let source_type = endpoint_type(rel.source_node_type, declared_type(&source_id));
        let target_type = endpoint_type(rel.target_node_type, declared_type(&target_id));

        relationships.push(Relationship::new(
            Node::new(source_id, source_type),
            Node::new(target_id, target_type),
            relationship_type(&rel_type),
        ));
    }

    ExtractedGraph {
        nodes,
        relationships,
    }
}

fn from_triples(triples: Vec<RawTriple>) -> ExtractedGraph {
    let mut graph = ExtractedGraph::default();

    for triple in triples {
        let (Some(head), Some(tail), Some(relation)) = (
            id_string(&triple.head),
            id_string(&triple.tail),
            triple.relation.filter(|r| !r.trim().is_empty()),
        ) else {
            debug!("Skipping incomplete triple in model reply");
            continue;
        };

        let source = Node::new(title_case(&head), endpoint_type(triple.head_type, None));
        let target = Node::new(title_case(&tail), endpoint_type(triple.tail_type, None));

        // Nodes are derived from the triples, deduplicated in first-seen order.
        for node in [&source, &target] {
            if !graph.nodes.contains(node) {
                graph.nodes.push(node.clone());
            }
        }
        graph
            .relationships
            .push(Relationship::new(source, target, relationship_type(&relation)));
    }

    graph
}

fn endpoint_type(given: Option<String>, declared: Option<String>) -> String {
    match given.filter(|t| !t.trim().is_empty()) {
        Some(t) => capitalize(&t),
        None => declared.unwrap_or_else(|| FALLBACK_NODE_TYPE.to_string()),
    }
}

/// Models sometimes emit numeric IDs; anything else non-textual is dropped.
fn id_string(value: &Value) -> Option<String> {
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

/// Upper-case the first letter of every word and lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `"works at"` becomes `"WORKS_AT"`.
pub fn relationship_type(s: &str) -> String {
    s.trim().replace(' ', "_").to_uppercase()
}

/// Locate a JSON value in model output that may wrap it in prose or code fences.
pub fn extract_json_from_text(s: &str) -> Result<Value> {
    let t = s.trim().trim_matches('\u{feff}');

    if let Ok(v) = serde_json::from_str::<Value>(t) {
        return Ok(v);
    }

    for fence in ["```json", "```"] {
        if let Some(start) = t.find(fence) {
            let body = &t[start + fence.len()..];
            if let Some(end) = body.find("```") {
                if let Ok(v) = serde_json::from_str::<Value>(body[..end].trim()) {
                    return Ok(v);
                }
            }
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(i), Some(j)) = (t.find(open), t.rfind(close)) {
            if i < j {
                if let Ok(v) = serde_json::from_str::<Value>(&t[i..=j]) {
                    return Ok(v);
                }
            }
        }
    }

    Err(Error::Parse("no valid JSON found in LLM output".into()))
}
