pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod webhook;

use axum::{Router, extract::DefaultBodyLimit, routing};
use std::sync::Arc;

use config::RelayConfig;
use error::Result;
use notifier::GotifyClient;

/// State shared by every request. Built once at startup, never mutated.
pub struct AppState {
    pub config: RelayConfig,
    pub notifier: GotifyClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let notifier = GotifyClient::new(&config)?;
        Ok(Self { config, notifier })
    }
}

pub type SharedState = Arc<AppState>;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Push payloads are accepted whatever their size
        .route(
            "/docker-webhook",
            routing::post(api::handle_webhook).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", routing::get(api::health))
        .with_state(state)
}
