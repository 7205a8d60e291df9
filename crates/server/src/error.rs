#![forbid(unsafe_code)]

use crate::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Validation(message) => message.clone(),
            Self::NotFound => self.to_string(),
            Self::Storage(err) => {
                tracing::error!(code = err.code(), error = %err, "storage failure");
                INTERNAL_MESSAGE.to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "internal failure");
                INTERNAL_MESSAGE.to_string()
            }
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
