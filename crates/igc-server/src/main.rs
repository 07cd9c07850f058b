//! IGC Info Server - HTTP API over an in-memory registry of flight tracks.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use igc_server::api;
use igc_server::config::Config;
use igc_server::fetch::HttpTrackParser;
use igc_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("igc_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting IGC Info Server...");

    let config = Config::from_env();
    let port = config.server_port;
    let parser = Arc::new(HttpTrackParser::new(&config)?);
    let state = Arc::new(AppState::new(parser));

    // Build the app
    let app = api::router()
        .with_state(state) // Inject state into all routes
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
