#![forbid(unsafe_code)]

mod proofs;
mod roadmaps;
mod uploads;

use crate::config::{DEFAULT_CORS_ORIGINS, DEFAULT_MAX_UPLOAD_BYTES};
use crate::{RoadmapService, ServiceError};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    service: Arc<RoadmapService>,
}

impl AppState {
    /// Runs a blocking service call off the async executor.
    async fn run<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&RoadmapService) -> Result<T, ServiceError> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|err| ServiceError::Internal(format!("blocking task failed: {err}")))?
    }
}

pub fn router(service: Arc<RoadmapService>, options: &HttpOptions) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/roadmap/generate", post(roadmaps::generate))
        .route("/api/roadmap/:id", get(roadmaps::get_roadmap))
        .route("/api/roadmap/:id/nodes/:node_id/proof", post(proofs::submit))
        .route("/api/roadmap/:id/nodes/:node_id/proofs", get(proofs::list))
        .route("/api/roadmap/:id/journey", get(proofs::journey))
        .route("/api/uploads/*filename", get(uploads::serve))
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn health() -> axum::Json<Value> {
    axum::Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut parsed = Vec::new();
    for origin in origins {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => parsed.push(value),
            Err(err) => tracing::warn!(origin = %origin, error = %err, "ignoring invalid CORS origin"),
        }
    }

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(parsed)
}

/// Roadmap ids in paths are integers; anything else names no roadmap.
fn parse_roadmap_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse::<i64>().map_err(|_| ServiceError::NotFound)
}
