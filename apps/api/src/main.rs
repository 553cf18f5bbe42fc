mod catalog;
mod config;
mod errors;
mod generation;
mod html;
mod images;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::images::ImageResolver;
use crate::llm_client::select_provider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pagesmith API v{}", env!("CARGO_PKG_VERSION"));

    // Load design catalogs (style presets, components, enhancements)
    let catalog = Arc::new(Catalog::load(&config)?);

    // Pick the chat provider once; requests never re-negotiate backends
    let llm = select_provider(&config);

    // Image resolver with its generation/search fallback chain
    let images = Arc::new(ImageResolver::new(&config));

    let state = AppState {
        llm,
        images,
        catalog,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
