#![forbid(unsafe_code)]

use crate::model::ProofType;
use serde::{Deserialize, Deserializer, Serialize};

/// A node as proposed by the generator, before namespacing.
///
/// Field defaults are applied here so the rest of the pipeline never deals with
/// missing or null members: absent `prerequisites`/`tasks` become empty, an absent,
/// empty or unrecognised `proof_type` becomes `reflection`. Ids may arrive as JSON
/// numbers and are kept as their decimal text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "id_text_list")]
    pub prerequisites: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<String>,
    #[serde(default, deserialize_with = "lenient_proof_type")]
    pub proof_type: ProofType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            prerequisites: Vec::new(),
            tasks: Vec::new(),
            proof_type: ProofType::default(),
            position_x: None,
            position_y: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Int(i64),
}

impl IdValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Int(value) => value.to_string(),
        }
    }
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdValue::deserialize(deserializer).map(IdValue::into_text)
}

fn id_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<IdValue>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(IdValue::into_text)
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_proof_type<'de, D>(deserializer: D) -> Result<ProofType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(str::trim)
        .and_then(ProofType::parse)
        .unwrap_or_default())
}
