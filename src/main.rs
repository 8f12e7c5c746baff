//! estate-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use estate_gateway::api;
use estate_gateway::app_state::AppState;
use estate_gateway::config::{GatewayConfig, LogFormat};
use estate_gateway::domain::FallbackStore;
use estate_gateway::service::ViewService;
use estate_gateway::source::SubgraphClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid gateway configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting estate-gateway");

    // Build source layer
    let fallback = FallbackStore::load(config.fallback_listings_path.as_deref())
        .context("failed to load fallback listings")?;
    let indexer = SubgraphClient::new(
        &config.subgraph_url,
        config.subgraph_timeout(),
        config.nested_page_size,
    )
    .context("failed to build subgraph client")?;
    tracing::info!(endpoint = indexer.endpoint(), "subgraph client ready");

    // Build service layer
    let view_service = Arc::new(ViewService::new(
        Arc::new(indexer),
        fallback,
        config.page_sizes(),
    ));

    // Build application state
    let app_state = AppState {
        view_service,
        contracts: Arc::new(config.contracts.clone()),
        countdown_interval: config.countdown_interval(),
    };

    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
