//! Platform-neutral inbound events and replies

use crate::ids::{ChannelId, GuildId, RoleId, UserId};
use crate::template::CashoutForm;

use super::commands::BotCommand;

/// Who triggered an interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: UserId,
    pub role_ids: Vec<RoleId>,
    /// Holds the platform's native administrator permission
    pub is_platform_admin: bool,
}

/// A server message that mentioned the bot
#[derive(Debug, Clone)]
pub struct MentionEvent {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub content: String,
    pub bot_user_id: UserId,
    pub bot_display_name: String,
}

/// A slash command invocation
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub guild_id: GuildId,
    pub guild_name: Option<String>,
    pub channel_id: ChannelId,
    pub invoker: Invoker,
    pub command: BotCommand,
}

/// A submitted cashout form
#[derive(Debug, Clone)]
pub struct CashoutSubmission {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub form: CashoutForm,
}

/// What the adapter should answer an interaction with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text visible only to the invoker
    Private(String),
    /// Show the cashout form
    OpenCashoutForm,
}

impl Reply {
    pub fn private(text: impl Into<String>) -> Self {
        Reply::Private(text.into())
    }

    /// Reply text, if this is a text reply
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::Private(text) => Some(text),
            Reply::OpenCashoutForm => None,
        }
    }
}

/// How a mention message was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionOutcome {
    /// Sent from a channel other than the configured command channel
    WrongChannel,
    /// Help text was shown
    Help,
    /// No known template was named
    UnknownTemplate,
    /// Rendered and posted
    Posted { channel_id: ChannelId },
    /// Rendered but the configured response channel no longer exists
    ResponseChannelMissing,
    /// Rendered but the platform refused the message
    DeliveryFailed,
}

impl MentionOutcome {
    /// Metric label
    pub fn label(self) -> &'static str {
        match self {
            MentionOutcome::WrongChannel => "wrong_channel",
            MentionOutcome::Help => "help",
            MentionOutcome::UnknownTemplate => "unknown_template",
            MentionOutcome::Posted { .. } => "posted",
            MentionOutcome::ResponseChannelMissing => "response_channel_missing",
            MentionOutcome::DeliveryFailed => "delivery_failed",
        }
    }
}
