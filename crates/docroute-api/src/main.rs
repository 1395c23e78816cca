//! # docroute-api — Binary Entry Point
//!
//! Loads configuration, wires the pipeline with HTTP collaborators, and
//! serves the API. Binds to `PORT` (default 8080).

use docroute_api::state::{AppConfig, AppState};
use docroute_pipeline::{Pipeline, PipelineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pipeline_config = PipelineConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;
    let config = AppConfig::from_env();
    let port = config.port;

    let pipeline = Pipeline::from_config(&pipeline_config).map_err(|e| {
        tracing::error!("Failed to build collaborator clients: {e}");
        e
    })?;
    tracing::info!(
        identifier_scheme = %pipeline.identifier_factory(),
        validation = pipeline.validation_profile().is_some(),
        "pipeline configured"
    );

    let state = AppState::new(pipeline, config, pipeline_config.items());
    let app = docroute_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("docroute API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
