use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::guild::SettingsStore;
use crate::template::TemplateEngine;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SettingsStore>,
    pub engine: Arc<TemplateEngine>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<SettingsStore>, engine: Arc<TemplateEngine>) -> Self {
        Self {
            store,
            engine,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}
