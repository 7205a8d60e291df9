#![forbid(unsafe_code)]

use super::super::StoreError;

// Node prerequisites and tasks are stored as JSON text arrays.

pub(in crate::store) fn encode_string_list(values: &[String]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(values)?)
}

pub(in crate::store) fn decode_string_list(raw: &str) -> Result<Vec<String>, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_lists_keep_order_and_content() {
        let values = vec![
            "Read \"the\" docs".to_string(),
            "ünïcode, commas".to_string(),
            String::new(),
            "a".to_string(),
        ];
        let encoded = encode_string_list(&values).unwrap();
        assert_eq!(decode_string_list(&encoded).unwrap(), values);
    }

    #[test]
    fn blank_column_decodes_to_empty() {
        assert!(decode_string_list("").unwrap().is_empty());
        assert!(decode_string_list("[]").unwrap().is_empty());
        assert!(decode_string_list("{").is_err());
    }
}
