//! serenity event handler translating Discord events into bot events

use std::sync::Arc;

use serenity::all::{
    Command, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, Interaction, Message, ModalInteraction, Ready,
};
use serenity::async_trait;

use crate::bot::{BotHandler, CashoutSubmission, CommandInvocation, Invoker, MentionEvent, Reply};
use crate::ids::{ChannelId, GuildId, RoleId, UserId};

use super::commands::{
    cashout_modal, command_definitions, parse_cashout_form, parse_command, CASHOUT_MODAL_ID,
};
use super::gateway::{truncate, DiscordGateway};

const GUILD_ONLY: &str = "❌ This command can only be used in a server.";

pub struct DiscordHandler {
    bot: Arc<BotHandler>,
}

impl DiscordHandler {
    pub fn new(bot: Arc<BotHandler>) -> Self {
        Self { bot }
    }

    async fn on_command(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(guild_id) = command.guild_id else {
            respond_private(ctx, command, GUILD_ONLY).await;
            return;
        };

        let Some(bot_command) = parse_command(&command.data) else {
            if let Some(text) = self.bot.handle_unknown_command(&command.data.name).text() {
                respond_private(ctx, command, text).await;
            }
            return;
        };

        let member = command.member.as_deref();
        let invoker = Invoker {
            user_id: UserId(command.user.id.get()),
            role_ids: member
                .map(|m| m.roles.iter().map(|r| RoleId(r.get())).collect())
                .unwrap_or_default(),
            is_platform_admin: member
                .and_then(|m| m.permissions)
                .map(|p| p.administrator())
                .unwrap_or(false),
        };

        let guild_name = ctx.cache.guild(guild_id).map(|guild| guild.name.clone());
        let invocation = CommandInvocation {
            guild_id: GuildId(guild_id.get()),
            guild_name,
            channel_id: ChannelId(command.channel_id.get()),
            invoker,
            command: bot_command,
        };

        let gateway = DiscordGateway::new(ctx.http.clone(), ctx.cache.clone());
        let response = match self.bot.handle_command(&gateway, &invocation).await {
            Reply::Private(text) => private_message(&text),
            Reply::OpenCashoutForm => CreateInteractionResponse::Modal(cashout_modal()),
        };

        if let Err(e) = command.create_response(&ctx.http, response).await {
            tracing::error!(
                error = %e,
                command = %command.data.name,
                "Failed to respond to slash command"
            );
        }
    }

    async fn on_modal(&self, ctx: &Context, modal: &ModalInteraction) {
        if modal.data.custom_id != CASHOUT_MODAL_ID {
            return;
        }
        let Some(guild_id) = modal.guild_id else {
            return;
        };

        let submission = CashoutSubmission {
            guild_id: GuildId(guild_id.get()),
            channel_id: ChannelId(modal.channel_id.get()),
            form: parse_cashout_form(&modal.data.components),
        };

        let gateway = DiscordGateway::new(ctx.http.clone(), ctx.cache.clone());
        let reply = self.bot.handle_cashout_submission(&gateway, &submission).await;

        if let Some(text) = reply.text() {
            if let Err(e) = modal.create_response(&ctx.http, private_message(text)).await {
                tracing::error!(error = %e, "Failed to respond to cashout form");
            }
        }
    }
}

fn private_message(text: &str) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(truncate(text))
            .ephemeral(true),
    )
}

async fn respond_private(ctx: &Context, command: &CommandInteraction, text: &str) {
    if let Err(e) = command.create_response(&ctx.http, private_message(text)).await {
        tracing::error!(error = %e, "Failed to respond to slash command");
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );

        match Command::set_global_commands(&ctx.http, command_definitions()).await {
            Ok(commands) => {
                tracing::info!(count = commands.len(), "Synced slash commands");
                for command in &commands {
                    tracing::debug!(command = %command.name, "Registered slash command");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to sync slash commands"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let gateway = DiscordGateway::new(ctx.http.clone(), ctx.cache.clone());
        let channel_id = ChannelId(msg.channel_id.get());
        if self
            .bot
            .handle_text_command(&gateway, channel_id, &msg.content)
            .await
        {
            return;
        }

        let (bot_id, bot_name) = {
            let me = ctx.cache.current_user();
            (me.id, me.name.clone())
        };
        if !msg.mentions_user_id(bot_id) {
            return;
        }

        let event = MentionEvent {
            guild_id: GuildId(guild_id.get()),
            channel_id,
            content: msg.content.clone(),
            bot_user_id: UserId(bot_id.get()),
            bot_display_name: bot_name,
        };

        self.bot.handle_mention(&gateway, &event).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.on_command(&ctx, &command).await,
            Interaction::Modal(modal) => self.on_modal(&ctx, &modal).await,
            _ => {}
        }
    }
}
