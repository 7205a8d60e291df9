#![forbid(unsafe_code)]

use clap::Parser;
use rp_generator::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, GeminiConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Clone, Debug, Parser)]
#[command(
    name = "rp_server",
    version,
    about = "Goal roadmaps with proof-of-progress tracking over HTTP"
)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "RP_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directory holding the SQLite database.
    #[arg(long, env = "RP_STORAGE_DIR", default_value = "./data")]
    pub storage_dir: PathBuf,

    /// Directory for proof attachments. Defaults to `<storage-dir>/uploads`.
    #[arg(long, env = "RP_UPLOADS_DIR")]
    pub uploads_dir: Option<PathBuf>,

    /// Enables model-backed roadmap generation. Without it every roadmap uses
    /// the built-in four-step plan.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "RP_GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "RP_GEMINI_ENDPOINT", default_value = DEFAULT_GEMINI_ENDPOINT)]
    pub gemini_endpoint: String,

    /// Allowed CORS origin; repeat the flag or pass a comma separated list.
    #[arg(
        long = "cors-origin",
        env = "RP_CORS_ORIGINS",
        value_delimiter = ',',
        default_values = DEFAULT_CORS_ORIGINS
    )]
    pub cors_origins: Vec<String>,

    /// Request body limit, applied to proof uploads.
    #[arg(long, env = "RP_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Emit logs as JSON lines.
    #[arg(long, env = "RP_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| self.storage_dir.join("uploads"))
    }

    pub fn gemini(&self) -> Option<GeminiConfig> {
        let api_key = self.gemini_api_key.as_deref().map(str::trim)?;
        if api_key.is_empty() {
            return None;
        }
        Some(GeminiConfig {
            api_key: api_key.to_string(),
            model: self.gemini_model.clone(),
            endpoint: self.gemini_endpoint.clone(),
        })
    }
}
