#![forbid(unsafe_code)]

use crate::{TextGeneration, fallback_roadmap, parse_roadmap_nodes, roadmap_prompt};
use rp_core::RawNode;

/// Produces raw roadmap nodes for a goal. Never fails: without a capability, or
/// when the capability errors or returns unusable output, the fixed fallback
/// plan is returned.
pub struct RoadmapGenerator {
    capability: Option<Box<dyn TextGeneration>>,
}

impl RoadmapGenerator {
    pub fn new(capability: Option<Box<dyn TextGeneration>>) -> Self {
        Self { capability }
    }

    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_offline(&self) -> bool {
        self.capability.is_none()
    }

    pub fn generate(&self, goal: &str) -> Vec<RawNode> {
        let Some(capability) = self.capability.as_deref() else {
            tracing::debug!("no text generation capability, using fallback roadmap");
            return fallback_roadmap();
        };

        let result = capability
            .generate_text(&roadmap_prompt(goal))
            .and_then(|text| parse_roadmap_nodes(&text));
        match result {
            Ok(nodes) => {
                tracing::debug!(nodes = nodes.len(), "roadmap generated");
                nodes
            }
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "roadmap generation failed, using fallback");
                fallback_roadmap()
            }
        }
    }
}

impl std::fmt::Debug for RoadmapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapGenerator")
            .field("offline", &self.is_offline())
            .finish()
    }
}
