#![forbid(unsafe_code)]

use super::{AppState, parse_roadmap_id};
use crate::ServiceError;
use crate::views::RoadmapView;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_USER_ID: &str = "default-user";
const DEFAULT_GOAL: &str = "Become a software engineer";

#[derive(Debug, Default, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    goal: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(super) async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    let body: GenerateBody = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| ServiceError::Validation(format!("invalid JSON body: {err}")))?
    };
    let user_id = or_default(body.user_id, DEFAULT_USER_ID);
    let goal = or_default(body.goal, DEFAULT_GOAL);

    let roadmap_id = state
        .run(move |service| service.create_roadmap(&user_id, &goal))
        .await?;
    Ok(Json(json!({ "roadmap_id": roadmap_id })))
}

pub(super) async fn get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoadmapView>, ServiceError> {
    let roadmap_id = parse_roadmap_id(&id)?;
    let roadmap = state
        .run(move |service| service.get_roadmap(roadmap_id))
        .await?;
    Ok(Json(RoadmapView::from(roadmap)))
}
