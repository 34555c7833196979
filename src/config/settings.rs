use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordConfig {
    /// Bot token (DISCORD_TOKEN); required to start
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// "file" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Settings document for the file backend
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// Ops HTTP server exposing /health and /metrics
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_enabled")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_storage_path() -> String {
    "bot_settings.json".to_string()
}

fn default_server_enabled() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("storage.backend", default_storage_backend())?
            .set_default("storage.path", default_storage_path())?
            .set_default("server.enabled", default_server_enabled())?
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("log.format", default_log_format())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // DISCORD_TOKEN, STORAGE_BACKEND, STORAGE_PATH, SERVER_PORT, LOG_FORMAT, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the bot cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord_token().is_none() {
            return Err(ConfigError::NotFound(
                "discord.token (set DISCORD_TOKEN)".to_string(),
            ));
        }
        Ok(())
    }

    /// Non-empty bot token, if configured
    pub fn discord_token(&self) -> Option<&str> {
        self.discord
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_server_enabled(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}
