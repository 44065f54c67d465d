//! Liveness probe

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;
use crate::config::WatchList;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub gotify_url: String,
    pub watched_images: WatchList,
}

/// GET /health - Report liveness and the active configuration
pub async fn health(AxumState(state): AxumState<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        gotify_url: state.config.gotify_url.clone(),
        watched_images: state.config.watched_images.clone(),
    })
}
