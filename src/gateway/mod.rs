//! Outbound operations the bot needs from a chat platform.
//!
//! Handlers only talk to the platform through [`Gateway`], so they can be
//! exercised against an in-memory implementation. The Discord adapter lives
//! in `crate::discord`.

mod memory;

pub use memory::{MemoryGateway, SentMessage};

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::{ChannelId, GuildId, RoleId};

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to send to channel {channel}: {reason}")]
    Send { channel: ChannelId, reason: String },

    #[error("Invalid platform id: {0}")]
    InvalidId(u64),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A channel that exists on a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub id: ChannelId,
    pub name: String,
}

impl ResolvedChannel {
    pub fn mention(&self) -> String {
        self.id.mention()
    }
}

/// Chat platform collaborator
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Post a message to a channel
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> GatewayResult<()>;

    /// Look up a channel on a server; `None` when it no longer exists or the
    /// lookup failed
    async fn resolve_channel(&self, guild_id: GuildId, channel_id: ChannelId)
        -> Option<ResolvedChannel>;

    /// Whether a role still exists on a server; `false` when the lookup failed
    async fn role_exists(&self, guild_id: GuildId, role_id: RoleId) -> bool;
}
