use document_processor::config::{DocumentConfig, SERVICE_NAME};
use document_processor::lifecycle::{shutdown_signal, ShutdownOutcome};
use document_processor::services::{init_metrics, MockProcessor};
use document_processor::startup::Application;
use service_core::observability::init_tracing;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let (config, warnings) = DocumentConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        SERVICE_NAME,
        config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(|e| std::io::Error::other(format!("Tracing initialization error: {}", e)))?;

    for warning in &warnings {
        tracing::warn!(%warning, "Configuration value ignored");
    }
    tracing::info!(level = %config.common.log_level, "Logger initialized");

    // Recorder must exist before the first request is served
    let metrics = init_metrics().map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize metrics");
        std::io::Error::other(format!("Metrics initialization error: {}", e))
    })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.common.port,
        "Starting document processor service"
    );

    let app = Application::build(config, Arc::new(MockProcessor::new()), Some(metrics))
        .await
        .map_err(|e| std::io::Error::other(format!("Startup error: {}", e)))?;

    match app.run_until_stopped(shutdown_signal()).await {
        Ok(ShutdownOutcome::Clean) => tracing::info!("Service shutdown complete"),
        Ok(ShutdownOutcome::Forced) => {
            tracing::warn!("Service shutdown complete, in-flight requests were abandoned")
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            return Err(std::io::Error::other(format!("Server error: {}", e)));
        }
    }

    Ok(())
}
