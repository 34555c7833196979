use axum::{routing::get, Router};

use crate::server::AppState;

use super::health::health;
use super::metrics::prometheus_metrics;
use super::template::list_templates;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Template catalog
        .nest(
            "/api/v1",
            Router::new().route("/templates", get(list_templates)),
        )
}
