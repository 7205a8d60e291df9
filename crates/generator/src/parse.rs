#![forbid(unsafe_code)]

use crate::GenerateError;
use rp_core::RawNode;
use serde_json::Value;

const FENCE: &str = "```";

/// Removes a surrounding markdown code fence: the opening line (with any
/// language tag) always, the last line only when it closes the fence.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with(FENCE) {
        return text;
    }

    let Some((_, body)) = text.split_once('\n') else {
        return "";
    };
    match body.rsplit_once('\n') {
        Some((inner, last)) if last.trim() == FENCE => inner,
        None if body.trim() == FENCE => "",
        _ => body,
    }
}

pub fn parse_roadmap_nodes(text: &str) -> Result<Vec<RawNode>, GenerateError> {
    let body = strip_code_fence(text);
    if body.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(GenerateError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}
