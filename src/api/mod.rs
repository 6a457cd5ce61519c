//! HTTP surface consumed by the dashboard frontend.

pub mod error;
pub mod handlers;
pub mod responses;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::{ServerSettings, WindowSettings};
use crate::service::{MetricsService, RefreshOrchestrator};

pub use error::ApiError;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<MetricsService>,
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub windows: WindowSettings,
}

/// Build the application router with all routes and middleware.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .nest("/api", routes::create_metrics_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the HTTP listener. `host` may be an IP literal or a hostname.
pub async fn bind(server: &ServerSettings) -> Result<TcpListener> {
    TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", server.host, server.port))
}
