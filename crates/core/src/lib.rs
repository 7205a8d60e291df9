#![forbid(unsafe_code)]

pub mod assembly;
pub mod raw;

pub use assembly::{Assembly, AssemblyError, DroppedPrerequisite, NodeDraft, assemble_nodes};
pub use model::{NodeProofType, ProofType, UnknownProofType};
pub use raw::RawNode;

pub mod ids {
    /// Raw id of the node synthesized for the roadmap goal.
    pub const START_NODE_KEY: &str = "start";

    const MAX_RAW_NODE_ID_LEN: usize = 128;

    /// Node ids are namespaced as `{roadmap_id}-{raw_id}`; clients split on the first `-`.
    pub fn node_id_prefix(roadmap_id: i64) -> String {
        format!("{roadmap_id}-")
    }

    pub fn namespaced_node_id(roadmap_id: i64, raw_id: &str) -> String {
        format!("{roadmap_id}-{raw_id}")
    }

    pub fn start_node_id(roadmap_id: i64) -> String {
        namespaced_node_id(roadmap_id, START_NODE_KEY)
    }

    pub fn is_roadmap_node_id(roadmap_id: i64, node_id: &str) -> bool {
        node_id
            .strip_prefix(&node_id_prefix(roadmap_id))
            .is_some_and(|rest| !rest.is_empty())
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum RawNodeIdError {
        Empty,
        TooLong,
        ContainsControl,
    }

    impl RawNodeIdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "node id must not be empty",
                Self::TooLong => "node id is too long",
                Self::ContainsControl => "node id contains control characters",
            }
        }
    }

    pub fn validate_raw_node_id(value: &str) -> Result<(), RawNodeIdError> {
        if value.trim().is_empty() {
            return Err(RawNodeIdError::Empty);
        }
        if value.len() > MAX_RAW_NODE_ID_LEN {
            return Err(RawNodeIdError::TooLong);
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(RawNodeIdError::ContainsControl);
        }
        Ok(())
    }
}

pub mod model {
    use serde::{Deserialize, Serialize};
    use std::str::FromStr;

    /// Kind of evidence a client can attach to a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ProofType {
        Photo,
        File,
        Link,
        #[default]
        Reflection,
    }

    impl ProofType {
        pub const ALL: [ProofType; 4] = [Self::Photo, Self::File, Self::Link, Self::Reflection];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Photo => "photo",
                Self::File => "file",
                Self::Link => "link",
                Self::Reflection => "reflection",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            Self::ALL.into_iter().find(|kind| kind.as_str() == value)
        }

        /// Only photo evidence completes a node.
        pub fn completes_node(self) -> bool {
            matches!(self, Self::Photo)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
    #[error("unknown proof type: {0:?}")]
    pub struct UnknownProofType(pub String);

    impl FromStr for ProofType {
        type Err = UnknownProofType;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            Self::parse(value).ok_or_else(|| UnknownProofType(value.to_string()))
        }
    }

    /// Proof type declared on a node. `Goal` marks the synthesized start node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum NodeProofType {
        Goal,
        Photo,
        File,
        Link,
        Reflection,
    }

    impl NodeProofType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Goal => "goal",
                Self::Photo => "photo",
                Self::File => "file",
                Self::Link => "link",
                Self::Reflection => "reflection",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            if value == "goal" {
                return Some(Self::Goal);
            }
            ProofType::parse(value).map(Self::from)
        }
    }

    impl From<ProofType> for NodeProofType {
        fn from(value: ProofType) -> Self {
            match value {
                ProofType::Photo => Self::Photo,
                ProofType::File => Self::File,
                ProofType::Link => Self::Link,
                ProofType::Reflection => Self::Reflection,
            }
        }
    }
}
