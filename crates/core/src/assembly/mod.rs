#![forbid(unsafe_code)]

//! Turns generator output into the persisted node graph of one roadmap.

mod layout;

pub use layout::{GRID_COLUMN_WIDTH, GRID_COLUMNS, GRID_ROW_HEIGHT, grid_position};

use crate::ids::{
    RawNodeIdError, START_NODE_KEY, namespaced_node_id, start_node_id, validate_raw_node_id,
};
use crate::model::NodeProofType;
use crate::raw::RawNode;
use std::collections::BTreeSet;

pub const START_NODE_DESCRIPTION: &str = "Your goal";

/// A node ready to be inserted, ids already namespaced.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub prerequisites: Vec<String>,
    pub tasks: Vec<String>,
    pub proof_type: NodeProofType,
    pub position_x: f64,
    pub position_y: f64,
    /// Set for the start node only; it needs no proof.
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedPrerequisite {
    pub node_id: String,
    pub prerequisite: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assembly {
    /// Start node first, then one draft per raw node in input order.
    pub nodes: Vec<NodeDraft>,
    /// Prerequisites that named no node of the roadmap.
    pub dropped: Vec<DroppedPrerequisite>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("invalid node id {id:?}: {}", .reason.message())]
    InvalidNodeId { id: String, reason: RawNodeIdError },
    #[error("duplicate node id {id:?}")]
    DuplicateNodeId { id: String },
}

pub fn assemble_nodes(
    roadmap_id: i64,
    goal: &str,
    raw_nodes: &[RawNode],
) -> Result<Assembly, AssemblyError> {
    let mut known = BTreeSet::new();
    known.insert(START_NODE_KEY);
    for raw in raw_nodes {
        validate_raw_node_id(&raw.id).map_err(|reason| AssemblyError::InvalidNodeId {
            id: raw.id.clone(),
            reason,
        })?;
        if !known.insert(raw.id.as_str()) {
            return Err(AssemblyError::DuplicateNodeId { id: raw.id.clone() });
        }
    }

    let start_id = start_node_id(roadmap_id);
    let mut nodes = Vec::with_capacity(raw_nodes.len() + 1);
    let mut dropped = Vec::new();

    nodes.push(NodeDraft {
        id: start_id.clone(),
        title: goal.to_string(),
        description: START_NODE_DESCRIPTION.to_string(),
        prerequisites: Vec::new(),
        tasks: Vec::new(),
        proof_type: NodeProofType::Goal,
        position_x: 0.0,
        position_y: 0.0,
        completed: true,
    });

    for (index, raw) in raw_nodes.iter().enumerate() {
        let id = namespaced_node_id(roadmap_id, &raw.id);

        let mut prerequisites = Vec::with_capacity(raw.prerequisites.len());
        for prerequisite in &raw.prerequisites {
            if known.contains(prerequisite.as_str()) {
                prerequisites.push(namespaced_node_id(roadmap_id, prerequisite));
            } else {
                dropped.push(DroppedPrerequisite {
                    node_id: id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
        if prerequisites.is_empty() {
            prerequisites.push(start_id.clone());
        }

        let (grid_x, grid_y) = grid_position(index);
        nodes.push(NodeDraft {
            id,
            title: raw.title.clone(),
            description: raw.description.clone(),
            prerequisites,
            tasks: raw.tasks.clone(),
            proof_type: raw.proof_type.into(),
            position_x: raw.position_x.unwrap_or(grid_x),
            position_y: raw.position_y.unwrap_or(grid_y),
            completed: false,
        });
    }

    Ok(Assembly { nodes, dropped })
}
