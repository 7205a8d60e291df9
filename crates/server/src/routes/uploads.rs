#![forbid(unsafe_code)]

use super::AppState;
use crate::ServiceError;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

pub(super) async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ServiceError> {
    let (name, bytes) = state.run(move |service| service.upload(&filename)).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes).into_response())
}

fn content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain; charset=utf-8",
        "json" => "application/json",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}
