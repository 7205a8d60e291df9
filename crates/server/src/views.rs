#![forbid(unsafe_code)]

//! JSON shapes returned by the HTTP surface. Timestamps are RFC 3339 strings.

use rp_core::{NodeProofType, ProofType};
use rp_storage::{NodeRow, ProofRow, RoadmapRow};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoadmapView {
    pub id: i64,
    pub user_id: String,
    pub goal: String,
    pub created_at: String,
    pub nodes: Vec<NodeView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub roadmap_id: i64,
    pub title: String,
    pub description: String,
    pub prerequisites: Vec<String>,
    pub tasks: Vec<String>,
    pub proof_type: NodeProofType,
    pub position_x: f64,
    pub position_y: f64,
    pub completed_at: Option<String>,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProofView {
    pub id: i64,
    pub node_id: String,
    pub proof_type: ProofType,
    pub value: String,
    pub file_path: Option<String>,
    pub created_at: String,
}

impl From<RoadmapRow> for RoadmapView {
    fn from(row: RoadmapRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            goal: row.goal,
            created_at: ts_ms_to_rfc3339(row.created_at_ms),
            nodes: row.nodes.into_iter().map(NodeView::from).collect(),
        }
    }
}

impl From<NodeRow> for NodeView {
    fn from(row: NodeRow) -> Self {
        let completed = row.completed();
        Self {
            id: row.id,
            roadmap_id: row.roadmap_id,
            title: row.title,
            description: row.description,
            prerequisites: row.prerequisites,
            tasks: row.tasks,
            proof_type: row.proof_type,
            position_x: row.position_x,
            position_y: row.position_y,
            completed_at: row.completed_at_ms.map(ts_ms_to_rfc3339),
            completed,
        }
    }
}

impl From<ProofRow> for ProofView {
    fn from(row: ProofRow) -> Self {
        Self {
            id: row.id,
            node_id: row.node_id,
            proof_type: row.proof_type,
            value: row.value,
            file_path: row.file_path,
            created_at: ts_ms_to_rfc3339(row.created_at_ms),
        }
    }
}

pub fn proof_views(rows: Vec<ProofRow>) -> Vec<ProofView> {
    rows.into_iter().map(ProofView::from).collect()
}

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = i128::from(ts_ms) * 1_000_000;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
