//! Per-server routing and permission settings.
//!
//! This module provides:
//! - `GuildSettings`: notify role, admin roles, command and response channels
//! - `SettingsStore`: in-memory store, loaded once and persisted on every mutation
//! - `SettingsBackend`: whole-document persistence (JSON file or memory)
//! - `is_authorized`: admin command authorization predicate
//!
//! # Configuration
//!
//! - `STORAGE_BACKEND=file|memory` - Where settings are persisted (default `file`)
//! - `STORAGE_PATH=bot_settings.json` - Settings file for the file backend

mod auth;
mod backend;
mod store;
mod types;

pub use auth::is_authorized;
pub use backend::{create_settings_backend, JsonFileBackend, MemoryBackend, SettingsBackend};
pub use store::SettingsStore;
pub use types::{
    GuildSettings, SettingsDocument, SettingsError, SettingsResult, StorageError, StorageResult,
};
