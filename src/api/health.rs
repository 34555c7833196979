//! Health check endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub storage: StorageHealthResponse,
    pub templates: usize,
}

#[derive(Debug, Serialize)]
pub struct StorageHealthResponse {
    pub backend: String,
    pub guilds_configured: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        storage: StorageHealthResponse {
            backend: state.store.backend_name().to_string(),
            guilds_configured: state.store.guild_count(),
        },
        templates: state.engine.template_names().count(),
    })
}
