//! Feed Server
//!
//! Simulated market feed: a random-walk ticker broadcast to every WebSocket
//! client, plus a small REST surface for the latest snapshot and health.

pub mod config;
pub mod feed;
pub mod ws_routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, routing::get, Json, Router};
use market_engine::Symbol;
use price_feed::{default_universe, PriceGenerator};
use serde::Serialize;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use feed::{run_feed, FeedBroadcast};

#[derive(Clone)]
pub struct AppState {
    pub universe: Arc<Vec<Symbol>>,
    pub feed: FeedBroadcast,
}

impl AppState {
    pub fn new(generator: &PriceGenerator) -> Self {
        Self {
            universe: Arc::new(generator.universe()),
            feed: FeedBroadcast::new(generator.snapshot()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    symbols: usize,
    clients: usize,
}

async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        symbols: state.universe.len(),
        clients: state.feed.receiver_count(),
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(ws_routes::ws_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let generator = PriceGenerator::new(default_universe(), config.volatility)
        .context("Failed to build price generator")?;
    let state = AppState::new(&generator);
    tracing::info!("Universe: {}", state.universe.join(", "));

    let shutdown = Arc::new(Notify::new());
    let feed_task = tokio::spawn(run_feed(
        generator,
        config.tick_interval(),
        state.feed.clone(),
        shutdown.clone(),
    ));

    let app = build_router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Feed server listening on {}", addr);

    let feed_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown requested");
            feed_shutdown.notify_one();
        })
        .await
        .context("Server error")?;

    // Covers the case where serve returned without the signal firing.
    shutdown.notify_one();
    feed_task.await.context("Price feed task panicked")?;
    Ok(())
}
