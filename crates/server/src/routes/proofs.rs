#![forbid(unsafe_code)]

use super::{AppState, parse_roadmap_id};
use crate::views::{ProofView, proof_views};
use crate::{Attachment, ProofSubmission, ServiceError};
use axum::Json;
use axum::extract::{Form, FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};

const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

/// Text fields of a proof submission, shared by the form and JSON encodings.
#[derive(Debug, Default, Deserialize)]
struct ProofFields {
    #[serde(default)]
    proof_type: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl From<ProofFields> for ProofSubmission {
    fn from(fields: ProofFields) -> Self {
        Self {
            proof_type: fields.proof_type,
            value: fields.value,
            attachment: None,
        }
    }
}

pub(super) async fn submit(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    request: Request,
) -> Result<Json<Value>, ServiceError> {
    let roadmap_id = parse_roadmap_id(&id)?;
    let submission = read_submission(request, &state).await?;

    state
        .run(move |service| service.submit_proof(roadmap_id, &node_id, submission))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

pub(super) async fn list(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
) -> Result<Json<Vec<ProofView>>, ServiceError> {
    let roadmap_id = parse_roadmap_id(&id)?;
    let proofs = state
        .run(move |service| service.get_proofs(roadmap_id, &node_id))
        .await?;
    Ok(Json(proof_views(proofs)))
}

pub(super) async fn journey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProofView>>, ServiceError> {
    let roadmap_id = parse_roadmap_id(&id)?;
    let proofs = state
        .run(move |service| service.get_journey(roadmap_id))
        .await?;
    Ok(Json(proof_views(proofs)))
}

async fn read_submission(
    request: Request,
    state: &AppState,
) -> Result<ProofSubmission, ServiceError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|err| ServiceError::Validation(format!("invalid multipart payload: {err}")))?;
        return read_multipart(multipart).await;
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<ProofFields>::from_request(request, state)
            .await
            .map_err(|err| ServiceError::Validation(format!("invalid form payload: {err}")))?;
        return Ok(fields.into());
    }

    let body = axum::body::to_bytes(request.into_body(), MAX_JSON_BODY_BYTES)
        .await
        .map_err(|err| ServiceError::Validation(format!("invalid request body: {err}")))?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProofSubmission::default());
    }
    let fields: ProofFields = serde_json::from_slice(&body)
        .map_err(|err| ServiceError::Validation(format!("invalid JSON body: {err}")))?;
    Ok(fields.into())
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProofSubmission, ServiceError> {
    let mut submission = ProofSubmission::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServiceError::Validation(format!("invalid multipart payload: {err}")))?
    {
        match field.name() {
            Some("proof_type") => {
                submission.proof_type = Some(field_text(field).await?);
            }
            Some("value") => {
                submission.value = Some(field_text(field).await?);
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|err| {
                    ServiceError::Validation(format!("invalid file field: {err}"))
                })?;
                submission.attachment = Some(Attachment {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }
    Ok(submission)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ServiceError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|err| ServiceError::Validation(format!("invalid {name} field: {err}")))
}
