use anyhow::Context;
use std::sync::Arc;
use tally_server::{start_ocr_worker, telemetry, AppState, ServerConfig, UploadStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    telemetry::init(config.log_format);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;

    let db = tally_storage::create_db(&config.database_path())
        .await
        .context("Failed to open database")?;

    let uploads = UploadStore::new(config.uploads_dir());
    uploads
        .ensure_dir()
        .await
        .context("Failed to create uploads directory")?;

    // The engine lives for the whole process; handlers share it through the state.
    let ocr = Arc::new(start_ocr_worker(&config.ocr).context("Failed to start OCR engine")?);

    let state = AppState { db: db.clone(), ocr: ocr.clone(), uploads };
    let app = tally_server::router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(addr = %listener.local_addr()?, data_dir = %config.data_dir.display(), "tally listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(ocr) {
        Ok(worker) => worker.shutdown(),
        Err(_) => tracing::warn!("ocr worker still referenced at exit"),
    }
    db.close().await;
    tracing::info!("tally stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
