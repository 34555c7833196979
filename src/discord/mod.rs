//! Discord adapter built on serenity.
//!
//! This module provides:
//! - `DiscordGateway`: the outbound `Gateway` over serenity's HTTP client
//! - `DiscordHandler`: translates messages, slash commands and modal
//!   submissions into bot events
//! - Slash command registration and the cashout modal

mod commands;
mod gateway;
mod handler;

pub use commands::{cashout_modal, command_definitions, parse_cashout_form, parse_command, CASHOUT_MODAL_ID};
pub use gateway::{truncate, DiscordGateway};
pub use handler::DiscordHandler;

use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::Client;

use crate::bot::BotHandler;

/// Intents the bot needs: server metadata, messages, and message text for
/// mention parsing
pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Build a serenity client wired to the bot handler
pub async fn build_client(token: &str, bot: Arc<BotHandler>) -> Result<Client, serenity::Error> {
    Client::builder(token, gateway_intents())
        .event_handler(DiscordHandler::new(bot))
        .await
}
