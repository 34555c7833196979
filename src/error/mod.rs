use thiserror::Error;

use crate::guild::SettingsError;
use crate::template::TemplateError;

/// Startup and lifecycle errors. Per-request problems never reach this type;
/// they are turned into reply text by the bot handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}
