mod settings;

pub use settings::{DiscordConfig, LogConfig, ServerConfig, Settings, StorageConfig};
