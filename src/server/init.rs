//! Server startup and shutdown

use crate::application::SearchService;
use crate::domain::error::Result;
use crate::infrastructure::config::{Config, ConfigLoader};
use crate::providers::embedding;
use crate::server::routes;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build a search service from loaded configuration
pub fn build_service(config: &Config) -> Arc<SearchService> {
    let embedder = embedding::from_model_name(&config.embedding.model);
    Arc::new(SearchService::new(
        embedder,
        config.layers,
        config.personalization,
        config.embedding.vector_dimension,
    ))
}

/// Load configuration, construct the cascade and serve until shutdown
pub async fn run_server(config_path: Option<&Path>) -> Result<()> {
    init_tracing();

    let loader = ConfigLoader::new();
    let config = match config_path {
        Some(path) => loader.load_with_file(path)?,
        None => loader.load()?,
    };

    let service = build_service(&config);
    service.warm_up().await?;

    let app = routes::router(service);
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "cascade search server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
