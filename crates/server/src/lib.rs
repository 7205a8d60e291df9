#![forbid(unsafe_code)]

pub mod config;
mod error;
mod routes;
pub mod service;
pub mod telemetry;
pub mod views;

pub use config::Config;
pub use routes::{HttpOptions, router};
pub use service::{Attachment, ProofSubmission, RoadmapService, ServiceError};
