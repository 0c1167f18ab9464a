// API Server Binary Entry Point
//
// Purpose: Serve the item catalog over HTTP
// Usage: cargo run --features api --bin api_server

use recycle_tools_rust::{create_router, AppState, EngineConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "recycle_tools_rust=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = EngineConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {}", config.data_dir.display());
    tracing::info!("  CACHE_TTL: {:?}", config.cache_ttl);
    tracing::info!("  IMAGE_BASE_URL: {}", config.image_base_url);
    tracing::info!("  LANGUAGE: {}", config.language);
    tracing::info!("  PORT: {}", config.port);

    // Load all four collections and build the catalog
    let state = AppState::new(&config).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
