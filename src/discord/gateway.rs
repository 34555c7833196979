//! `Gateway` implementation over serenity's cache and HTTP client

use std::sync::Arc;

use async_trait::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::id as discord;

use crate::gateway::{Gateway, GatewayError, GatewayResult, ResolvedChannel};
use crate::ids::{ChannelId, GuildId, RoleId};

/// Discord's maximum message content length in characters
const MAX_DISCORD_LEN: usize = 2000;

/// Truncate a string to Discord's message length limit
pub fn truncate(s: &str) -> &str {
    match s.char_indices().nth(MAX_DISCORD_LEN) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

// Discord ids are non-zero; a zero can only come from a hand-edited settings file
fn guild(id: GuildId) -> Option<discord::GuildId> {
    (id.get() != 0).then(|| discord::GuildId::new(id.get()))
}

fn channel(id: ChannelId) -> Option<discord::ChannelId> {
    (id.get() != 0).then(|| discord::ChannelId::new(id.get()))
}

fn role(id: RoleId) -> Option<discord::RoleId> {
    (id.get() != 0).then(|| discord::RoleId::new(id.get()))
}

/// Lookups go to the gateway cache first and fall back to HTTP only for
/// servers the cache has not seen.
pub struct DiscordGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    /// `None` when the server is not cached; `Some(None)` when it is cached
    /// but the channel is gone
    fn cached_channel(
        &self,
        server: discord::GuildId,
        wanted: discord::ChannelId,
        channel_id: ChannelId,
    ) -> Option<Option<ResolvedChannel>> {
        let cached = self.cache.guild(server)?;
        Some(cached.channels.get(&wanted).map(|found| ResolvedChannel {
            id: channel_id,
            name: found.name.clone(),
        }))
    }

    fn cached_role(&self, server: discord::GuildId, wanted: discord::RoleId) -> Option<bool> {
        let cached = self.cache.guild(server)?;
        Some(cached.roles.contains_key(&wanted))
    }
}

#[async_trait]
impl Gateway for DiscordGateway {
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> GatewayResult<()> {
        let target = channel(channel_id).ok_or(GatewayError::InvalidId(channel_id.get()))?;

        target
            .say(&self.http, truncate(text))
            .await
            .map(|_| ())
            .map_err(|e| GatewayError::Send {
                channel: channel_id,
                reason: e.to_string(),
            })
    }

    async fn resolve_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Option<ResolvedChannel> {
        let (server, wanted) = (guild(guild_id)?, channel(channel_id)?);

        if let Some(cached) = self.cached_channel(server, wanted, channel_id) {
            return cached;
        }

        match server.channels(&self.http).await {
            Ok(mut channels) => channels.remove(&wanted).map(|found| ResolvedChannel {
                id: channel_id,
                name: found.name,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    guild_id = %guild_id,
                    channel_id = %channel_id,
                    "Failed to fetch guild channels"
                );
                None
            }
        }
    }

    async fn role_exists(&self, guild_id: GuildId, role_id: RoleId) -> bool {
        let (Some(server), Some(wanted)) = (guild(guild_id), role(role_id)) else {
            return false;
        };

        if let Some(cached) = self.cached_role(server, wanted) {
            return cached;
        }

        match server.roles(&self.http).await {
            Ok(roles) => roles.contains_key(&wanted),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    guild_id = %guild_id,
                    role_id = %role_id,
                    "Failed to fetch guild roles"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short"), "short");

        let at_limit = "é".repeat(MAX_DISCORD_LEN);
        assert_eq!(truncate(&at_limit), at_limit);

        let long = "é".repeat(2500);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_DISCORD_LEN);
        assert!(long.starts_with(cut));
    }

    #[test]
    fn test_zero_ids_are_rejected() {
        assert!(channel(ChannelId(0)).is_none());
        assert!(guild(GuildId(0)).is_none());
        assert_eq!(role(RoleId(5)).map(|r| r.get()), Some(5));
    }

    #[test]
    fn test_uncached_server_falls_through_to_http() {
        let gateway = DiscordGateway::new(Arc::new(Http::new("")), Arc::new(Cache::new()));
        let server = discord::GuildId::new(1);

        assert!(gateway
            .cached_channel(server, discord::ChannelId::new(2), ChannelId(2))
            .is_none());
        assert!(gateway.cached_role(server, discord::RoleId::new(3)).is_none());
    }
}
