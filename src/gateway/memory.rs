//! In-memory gateway that records outbound messages.
//!
//! Used by tests and dry runs; channels and roles exist only once registered.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::ids::{ChannelId, GuildId, RoleId};

use super::{Gateway, GatewayError, GatewayResult, ResolvedChannel};

/// A message accepted by [`MemoryGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub text: String,
}

#[derive(Default)]
pub struct MemoryGateway {
    channels: HashMap<(GuildId, ChannelId), String>,
    roles: HashSet<(GuildId, RoleId)>,
    failing: HashSet<ChannelId>,
    sent: Mutex<Vec<SentMessage>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel that `resolve_channel` will find
    pub fn with_channel(mut self, guild_id: GuildId, channel_id: ChannelId, name: &str) -> Self {
        self.channels.insert((guild_id, channel_id), name.to_string());
        self
    }

    /// Register a role that `role_exists` will report
    pub fn with_role(mut self, guild_id: GuildId, role_id: RoleId) -> Self {
        self.roles.insert((guild_id, role_id));
        self
    }

    /// Make every send to `channel_id` fail
    pub fn failing_channel(mut self, channel_id: ChannelId) -> Self {
        self.failing.insert(channel_id);
        self
    }

    /// Every message sent so far, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts sent to one channel, in order
    pub fn sent_to(&self, channel_id: ChannelId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .map(|m| m.text)
            .collect()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> GatewayResult<()> {
        if self.failing.contains(&channel_id) {
            return Err(GatewayError::Send {
                channel: channel_id,
                reason: "missing access".to_string(),
            });
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMessage {
                channel_id,
                text: text.to_string(),
            });
        Ok(())
    }

    async fn resolve_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Option<ResolvedChannel> {
        self.channels
            .get(&(guild_id, channel_id))
            .map(|name| ResolvedChannel {
                id: channel_id,
                name: name.clone(),
            })
    }

    async fn role_exists(&self, guild_id: GuildId, role_id: RoleId) -> bool {
        self.roles.contains(&(guild_id, role_id))
    }
}
