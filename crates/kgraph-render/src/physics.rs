//! Force-directed layout configuration, serialized in vis-network's option format.

use serde::{Deserialize, Serialize};

/// `forceAtlas2Based` solver constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceAtlas2Based {
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub spring_constant: f64,
}

/// The `physics` block of the network options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsOptions {
    pub force_atlas2_based: ForceAtlas2Based,
    pub min_velocity: f64,
    pub solver: String,
}

impl Default for PhysicsOptions {
    /// Fixed layout used for every graph regardless of size.
    fn default() -> Self {
        Self {
            force_atlas2_based: ForceAtlas2Based {
                gravitational_constant: -100.0,
                central_gravity: 0.01,
                spring_length: 200.0,
                spring_constant: 0.08,
            },
            min_velocity: 0.75,
            solver: "forceAtlas2Based".into(),
        }
    }
}

impl PhysicsOptions {
    /// Full vis-network options object: `{"physics": {...}}`.
    pub fn to_vis_options(&self) -> serde_json::Value {
        serde_json::json!({ "physics": self })
    }
}
