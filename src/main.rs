//! DiabetesCare: diabetes risk screening service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use diabetescare::adapters::model::TrainedModelBundle;
use diabetescare::adapters::sanitize::SanitizingMakeWriter;
use diabetescare::application::AssessmentService;
use diabetescare::config::{AppConfig, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    let (writer, _guard) = match &config.log_target {
        LogTarget::File(log_file) => {
            if let Some(parent) = log_file.parent() {
                // Best-effort: the open below reports the real failure.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting DiabetesCare...");

    let thresholds = config.thresholds()?;
    let bundle = Arc::new(TrainedModelBundle::load(&config.model_dir));
    if config.require_model && !bundle.status().is_complete() {
        return Err(anyhow!(
            "Model bundle at {:?} is incomplete and DIABETESCARE_REQUIRE_MODEL is set. Run check_models for details.",
            config.model_dir
        ));
    }

    let service = Arc::new(AssessmentService::from_thresholds(
        &thresholds,
        config.intake_policy,
        bundle,
    ));
    tracing::info!("Intake policy: {:?}", service.policy());

    let app = diabetescare::http::router(service);
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("DiabetesCare shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
