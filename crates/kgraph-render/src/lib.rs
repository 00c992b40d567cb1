//! Graph rendering: validated nodes and edges into a standalone vis-network page.

pub mod html;
pub mod network;
pub mod physics;
pub mod renderer;

pub use network::{Network, NetworkOptions, VisEdge, VisNode};
pub use physics::{ForceAtlas2Based, PhysicsOptions};
pub use renderer::{
    build_network, render, GraphArtifact, ItemKind, RenderOptions, RenderReport, Rendered,
    SkippedItem,
};
