#![forbid(unsafe_code)]

//! Roadmap generation: prompt an injected text model for a node list and fall
//! back to a fixed four-step plan whenever that fails.

mod capability;
mod error;
mod fallback;
mod gemini;
mod generator;
mod parse;
mod prompt;

pub use capability::TextGeneration;
pub use error::GenerateError;
pub use fallback::fallback_roadmap;
pub use gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, GeminiClient, GeminiConfig};
pub use generator::RoadmapGenerator;
pub use parse::{parse_roadmap_nodes, strip_code_fence};
pub use prompt::roadmap_prompt;
