//! API layer - HTTP endpoint handlers for the ops server.

mod health;
mod metrics;
mod routes;
mod template;

pub use health::{health, HealthResponse, StorageHealthResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{list_templates, TemplateInfo, TemplateListResponse};
