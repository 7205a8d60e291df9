#![forbid(unsafe_code)]

use clap::Parser;
use rp_server::{Config, HttpOptions, RoadmapService, router, telemetry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    telemetry::init_tracing(config.log_json)?;

    let service = Arc::new(RoadmapService::open(&config)?);
    let options = HttpOptions {
        cors_origins: config.cors_origins.clone(),
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = router(service, &options);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        storage_dir = %config.storage_dir.display(),
        uploads_dir = %config.uploads_dir().display(),
        "rp_server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("rp_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
