//! Visualization container backed by a petgraph directed graph.

use std::collections::HashMap;

use kgraph_core::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::physics::PhysicsOptions;

/// Display options for the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOptions {
    pub height: String,
    pub width: String,
    pub directed: bool,
    pub bgcolor: String,
    pub font_color: String,
    /// Show the select-by-attribute filter bar above the graph.
    pub filter_menu: bool,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            height: "1200px".into(),
            width: "100%".into(),
            directed: true,
            bgcolor: "#222222".into(),
            font_color: "white".into(),
            filter_menu: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFont {
    pub color: String,
}

/// A node as vis-network consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    /// Hover tooltip.
    pub title: String,
    /// Colour group.
    pub group: String,
    pub shape: String,
    pub font: NodeFont,
}

/// An edge as vis-network consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrows: Option<String>,
}

/// Mutable graph under construction for one render.
pub struct Network {
    graph: DiGraph<VisNode, VisEdge>,
    node_index: HashMap<String, NodeIndex>,
    options: NetworkOptions,
    physics: PhysicsOptions,
}

impl Network {
    pub fn new(options: NetworkOptions) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            options,
            physics: PhysicsOptions::default(),
        }
    }

    /// Add a node. Returns `false` if a node with this ID already exists,
    /// in which case the existing node is kept unchanged.
    pub fn add_node(&mut self, id: &str, label: &str, title: &str, group: &str) -> Result<bool> {
        if id.trim().is_empty() {
            return Err(Error::Render("node id must not be empty".into()));
        }
        if self.node_index.contains_key(id) {
            return Ok(false);
        }

        let idx = self.graph.add_node(VisNode {
            id: id.to_string(),
            label: label.to_string(),
            title: title.to_string(),
            group: group.to_string(),
            shape: "dot".into(),
            font: NodeFont {
                color: self.options.font_color.clone(),
            },
        });
        self.node_index.insert(id.to_string(), idx);
        Ok(true)
    }

    /// Add a directed edge. Both endpoints must already be in the network.
    pub fn add_edge(&mut self, source: &str, target: &str, label: &str) -> Result<()> {
        let from = *self
            .node_index
            .get(source)
            .ok_or_else(|| Error::Render(format!("non existent node '{}'", source)))?;
        let to = *self
            .node_index
            .get(target)
            .ok_or_else(|| Error::Render(format!("non existent node '{}'", target)))?;

        let arrows = self.options.directed.then(|| "to".to_string());
        self.graph.add_edge(
            from,
            to,
            VisEdge {
                from: source.to_string(),
                to: target.to_string(),
                label: label.to_string(),
                arrows,
            },
        );
        Ok(())
    }

    pub fn set_physics(&mut self, physics: PhysicsOptions) {
        self.physics = physics;
    }

    pub fn physics(&self) -> &PhysicsOptions {
        &self.physics
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }

    pub fn get_node(&self, id: &str) -> Option<&VisNode> {
        self.node_index.get(id).map(|idx| &self.graph[*idx])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &VisNode> {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &VisEdge> {
        self.graph.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Structural content of the network: nodes, edges and options, as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nodes": self.nodes().collect::<Vec<_>>(),
            "edges": self.edges().collect::<Vec<_>>(),
            "options": self.physics.to_vis_options(),
        })
    }
}
