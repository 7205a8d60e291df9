#![forbid(unsafe_code)]

use crate::GenerateError;

/// A text model that answers one prompt with one completion.
pub trait TextGeneration: Send + Sync {
    fn generate_text(&self, prompt: &str) -> Result<String, GenerateError>;
}
