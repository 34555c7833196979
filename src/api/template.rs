//! Read-only template catalog endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub title: String,
    /// Positional fields in the order mention lines fill them
    pub fields: Vec<String>,
    pub placeholders: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
    pub total: usize,
}

/// GET /api/v1/templates - List the template catalog
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates: Vec<TemplateInfo> = state
        .engine
        .template_names()
        .filter_map(|name| state.engine.lookup(name))
        .map(|template| TemplateInfo {
            name: template.name().to_string(),
            title: template.title.clone(),
            fields: template.fields.clone(),
            placeholders: template.placeholders().to_vec(),
        })
        .collect();

    let total = templates.len();
    Json(TemplateListResponse { templates, total })
}
