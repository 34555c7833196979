//! Server settings types and error definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ChannelId, GuildId, RoleId};

/// Routing and permission settings for one server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Role mentioned automatically in generated notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_role_id: Option<RoleId>,

    /// Roles allowed to run admin commands; empty means platform
    /// administrators only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_role_ids: Vec<RoleId>,

    /// Only channel in which requests are accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_channel_id: Option<ChannelId>,

    /// Channel generated notifications are posted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_channel_id: Option<ChannelId>,
}

/// Whole persisted settings document, keyed by server id
pub type SettingsDocument = BTreeMap<GuildId, GuildSettings>;

/// Backend storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Settings storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for backend operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Settings store error type
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Notify role is already set to {0}")]
    AlreadySet(RoleId),

    #[error("No notify role is set")]
    NotSet,

    #[error("Failed to persist settings: {0}")]
    Persistence(#[from] StorageError),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
