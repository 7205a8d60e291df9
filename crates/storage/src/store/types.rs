#![forbid(unsafe_code)]

use rp_core::{NodeProofType, ProofType};

#[derive(Clone, Debug, PartialEq)]
pub struct RoadmapRow {
    pub id: i64,
    pub user_id: String,
    pub goal: String,
    pub created_at_ms: i64,
    /// Ordered by node id.
    pub nodes: Vec<NodeRow>,
}

impl RoadmapRow {
    pub fn node(&self, node_id: &str) -> Option<&NodeRow> {
        self.nodes.iter().find(|node| node.id == node_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRow {
    pub id: String,
    pub roadmap_id: i64,
    pub title: String,
    pub description: String,
    pub prerequisites: Vec<String>,
    pub tasks: Vec<String>,
    pub proof_type: NodeProofType,
    pub position_x: f64,
    pub position_y: f64,
    pub completed_at_ms: Option<i64>,
}

impl NodeRow {
    pub fn completed(&self) -> bool {
        self.completed_at_ms.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofRow {
    pub id: i64,
    pub node_id: String,
    pub proof_type: ProofType,
    pub value: String,
    pub file_path: Option<String>,
    pub created_at_ms: i64,
}
