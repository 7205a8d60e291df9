#![forbid(unsafe_code)]

use rp_core::{ProofType, RawNode};

#[derive(Clone, Debug, PartialEq)]
pub struct CreateRoadmapRequest {
    pub user_id: String,
    pub goal: String,
    pub nodes: Vec<RawNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddProofRequest {
    pub node_id: String,
    pub proof_type: ProofType,
    pub value: String,
    /// Basename inside the uploads directory, when a blob was attached.
    pub file_path: Option<String>,
}
