//! Relay HTTP server built on axum.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::api::handlers;
use crate::config::ApiConfig;
use crate::database::DatabaseService;
use crate::services::ServiceFactory;
use crate::utils::errors::{Result, UiBotError};

/// Shared state for relay request handlers.
#[derive(Clone)]
pub struct ApiState {
    pub database: DatabaseService,
    pub services: Arc<ServiceFactory>,
    /// Request sources allowed to fetch credentials
    pub allowed_sources: Arc<Vec<String>>,
}

impl ApiState {
    pub fn new(services: Arc<ServiceFactory>) -> Self {
        Self {
            database: services.database.clone(),
            allowed_sources: Arc::new(services.settings.api.allowed_sources.clone()),
            services,
        }
    }

    pub fn is_allowed_source(&self, source: &str) -> bool {
        self.allowed_sources.iter().any(|allowed| allowed == source)
    }
}

/// Build the relay routes:
/// - POST /get_po_credentials
/// - GET /health
/// - GET /
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/get_po_credentials", post(handlers::post_credentials))
        .with_state(state)
}

/// Bind to the configured host:port and serve until the process stops
pub async fn serve(config: &ApiConfig, state: ApiState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| UiBotError::Config(format!("failed to bind relay API to {addr}: {e}")))?;

    info!("Relay API listening on {addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
