//! Handling of mentions, slash commands and cashout forms

use std::sync::Arc;

use crate::gateway::Gateway;
use crate::guild::{is_authorized, GuildSettings, SettingsError, SettingsResult, SettingsStore};
use crate::ids::{ChannelId, GuildId, RoleId};
use crate::metrics::BotMetrics;
use crate::template::{
    strip_bot_mentions, template_name_candidate, FieldMap, TemplateEngine, TemplateKind,
};

use super::commands::{BotCommand, HELP_TEXT_COMMAND, MAX_ADMIN_ROLES};
use super::events::{CashoutSubmission, CommandInvocation, MentionEvent, MentionOutcome, Reply};
use super::replies;

/// Platform-neutral request handling.
///
/// Every method takes the gateway to answer through, so one handler serves
/// any number of connections.
pub struct BotHandler {
    engine: Arc<TemplateEngine>,
    settings: Arc<SettingsStore>,
}

impl BotHandler {
    pub fn new(engine: Arc<TemplateEngine>, settings: Arc<SettingsStore>) -> Self {
        BotMetrics::set_guilds_configured(settings.guild_count());
        Self { engine, settings }
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    // ========================================================================
    // Mentions
    // ========================================================================

    /// Handle a message that mentioned the bot
    pub async fn handle_mention(&self, gateway: &dyn Gateway, event: &MentionEvent) -> MentionOutcome {
        let outcome = self.process_mention(gateway, event).await;

        BotMetrics::record_mention(outcome.label());
        tracing::info!(
            guild_id = %event.guild_id,
            channel_id = %event.channel_id,
            outcome = outcome.label(),
            "Mention handled"
        );
        outcome
    }

    async fn process_mention(&self, gateway: &dyn Gateway, event: &MentionEvent) -> MentionOutcome {
        let settings = self.settings.get(event.guild_id);

        if let Some(required) = self
            .command_channel_violation(gateway, event.guild_id, event.channel_id, &settings)
            .await
        {
            self.send(gateway, event.channel_id, &replies::use_command_channel(&required))
                .await;
            return MentionOutcome::WrongChannel;
        }

        let stripped = strip_bot_mentions(&event.content, event.bot_user_id);
        if template_name_candidate(&stripped).as_deref() == Some(BotCommand::HELP) {
            self.send(gateway, event.channel_id, &self.engine.help_text()).await;
            return MentionOutcome::Help;
        }

        let Some(parsed) = self.engine.parse_free_text(&event.content, event.bot_user_id) else {
            let available = self.engine.template_names().collect::<Vec<_>>().join(", ");
            self.send(
                gateway,
                event.channel_id,
                &replies::unknown_template(&available, &event.bot_display_name),
            )
            .await;
            return MentionOutcome::UnknownTemplate;
        };

        let text = self.render(parsed.kind, &parsed.fields, event.guild_id);

        let Some(response_id) = settings.response_channel_id else {
            return if self.send(gateway, event.channel_id, &text).await {
                MentionOutcome::Posted {
                    channel_id: event.channel_id,
                }
            } else {
                MentionOutcome::DeliveryFailed
            };
        };

        let Some(channel) = gateway.resolve_channel(event.guild_id, response_id).await else {
            tracing::warn!(
                guild_id = %event.guild_id,
                channel_id = %response_id,
                "Configured response channel no longer exists"
            );
            self.send(gateway, event.channel_id, replies::RESPONSE_CHANNEL_MISSING)
                .await;
            return MentionOutcome::ResponseChannelMissing;
        };

        if !self.send(gateway, channel.id, &text).await {
            self.send(gateway, event.channel_id, &replies::delivery_failed(&channel.mention()))
                .await;
            return MentionOutcome::DeliveryFailed;
        }

        tracing::debug!(
            guild_id = %event.guild_id,
            channel = %channel.name,
            template = %parsed.kind,
            "Template posted to response channel"
        );
        self.send(gateway, event.channel_id, &replies::template_posted(&channel.mention()))
            .await;
        MentionOutcome::Posted {
            channel_id: channel.id,
        }
    }

    /// Answer a prefixed text command. Returns `false` when `content` is not
    /// one, so the caller can go on to mention handling.
    pub async fn handle_text_command(
        &self,
        gateway: &dyn Gateway,
        channel_id: ChannelId,
        content: &str,
    ) -> bool {
        let is_help = content
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case(HELP_TEXT_COMMAND));
        if !is_help {
            return false;
        }

        BotMetrics::record_command(HELP_TEXT_COMMAND);
        self.send(gateway, channel_id, &self.engine.help_text()).await;
        true
    }

    // ========================================================================
    // Slash commands
    // ========================================================================

    /// Reply for a slash command this build does not know (e.g. a stale
    /// registration) or one missing a required option
    pub fn handle_unknown_command(&self, name: &str) -> Reply {
        BotMetrics::record_command("unknown");
        tracing::warn!(command = %name, "Unknown or malformed slash command");
        Reply::private(replies::UNKNOWN_COMMAND)
    }

    /// Handle a slash command and produce the interaction reply
    pub async fn handle_command(&self, gateway: &dyn Gateway, invocation: &CommandInvocation) -> Reply {
        let command = &invocation.command;
        let guild_id = invocation.guild_id;
        let invoker = &invocation.invoker;
        BotMetrics::record_command(command.name());

        let settings = self.settings.get(guild_id);
        if command.requires_admin()
            && !is_authorized(invoker.is_platform_admin, &invoker.role_ids, &settings)
        {
            return self.deny(invocation, replies::PERMISSION_DENIED);
        }

        match command {
            BotCommand::Cashout => {
                match self
                    .command_channel_violation(gateway, guild_id, invocation.channel_id, &settings)
                    .await
                {
                    Some(required) => Reply::Private(replies::use_this_command_in(&required)),
                    None => Reply::OpenCashoutForm,
                }
            }
            BotCommand::Help => Reply::Private(self.engine.help_text()),
            BotCommand::Templates => {
                Reply::Private(replies::template_list(&self.engine.list_templates()))
            }
            BotCommand::BotSettings => {
                Reply::Private(self.describe_settings(gateway, invocation, &settings).await)
            }
            BotCommand::SetAdminRoles(roles) => {
                if !invoker.is_platform_admin {
                    return self.deny(invocation, replies::ADMINISTRATOR_REQUIRED);
                }

                let mut unique: Vec<RoleId> = Vec::with_capacity(roles.len());
                for role in roles.iter().take(MAX_ADMIN_ROLES) {
                    if !unique.contains(role) {
                        unique.push(*role);
                    }
                }
                if unique.is_empty() {
                    return Reply::private(replies::NO_ADMIN_ROLES);
                }

                let result = self.settings.set_admin_roles(guild_id, unique.clone());
                self.settings_reply("admin_roles", result, || replies::admin_roles_set(&unique))
            }
            BotCommand::SetNotifyRole(role) => {
                let result = self.settings.set_notify_role(guild_id, *role);
                self.settings_reply("notify_role", result, || replies::notify_role_set(*role))
            }
            BotCommand::RemoveNotifyRole => {
                let result = self.settings.clear_notify_role(guild_id).map(|_| ());
                self.settings_reply("notify_role", result, || {
                    replies::NOTIFY_ROLE_REMOVED.to_string()
                })
            }
            BotCommand::SetCommandChannel(channel) => {
                let result = self.settings.set_command_channel(guild_id, *channel);
                self.settings_reply("command_channel", result, || {
                    replies::command_channel_set(*channel)
                })
            }
            BotCommand::SetResponseChannel(channel) => {
                let result = self.settings.set_response_channel(guild_id, *channel);
                self.settings_reply("response_channel", result, || {
                    replies::response_channel_set(*channel)
                })
            }
        }
    }

    fn deny(&self, invocation: &CommandInvocation, text: &str) -> Reply {
        BotMetrics::record_authorization_denied();
        tracing::info!(
            guild_id = %invocation.guild_id,
            user_id = %invocation.invoker.user_id,
            command = invocation.command.name(),
            "Admin command denied"
        );
        Reply::private(text)
    }

    fn settings_reply(
        &self,
        setting: &str,
        result: SettingsResult<()>,
        on_success: impl FnOnce() -> String,
    ) -> Reply {
        BotMetrics::record_settings_mutation(setting, result.is_ok());
        BotMetrics::set_guilds_configured(self.settings.guild_count());

        match result {
            Ok(()) => Reply::Private(on_success()),
            Err(SettingsError::AlreadySet(_)) => Reply::private(replies::NOTIFY_ROLE_ALREADY_SET),
            Err(SettingsError::NotSet) => Reply::private(replies::NOTIFY_ROLE_NOT_SET),
            Err(SettingsError::Persistence(e)) => {
                tracing::error!(error = %e, setting = setting, "Failed to persist settings");
                Reply::private(replies::SAVE_FAILED)
            }
        }
    }

    async fn describe_settings(
        &self,
        gateway: &dyn Gateway,
        invocation: &CommandInvocation,
        settings: &GuildSettings,
    ) -> String {
        let guild_id = invocation.guild_id;

        let notify_role = match settings.notify_role_id {
            Some(role) => self.role_mention(gateway, guild_id, role).await,
            None => "Not set".to_string(),
        };

        let admin_roles = if settings.admin_role_ids.is_empty() {
            "❌ None set (defaults to Discord Administrator permission)".to_string()
        } else {
            let mut mentions = Vec::with_capacity(settings.admin_role_ids.len());
            for role in &settings.admin_role_ids {
                mentions.push(self.role_mention(gateway, guild_id, *role).await);
            }
            mentions.join(", ")
        };

        let command_channel = match settings.command_channel_id {
            Some(channel) => self.channel_mention(gateway, guild_id, channel).await,
            None => "Any channel".to_string(),
        };

        let response_channel = match settings.response_channel_id {
            Some(channel) => self.channel_mention(gateway, guild_id, channel).await,
            None => "Same as command channel".to_string(),
        };

        format!(
            "**Bot Settings for {}:**\n\n\
             📢 **Notify Role:** {}\n\
             🛡 **Admin Roles:** {}\n\
             📝 **Command Channel:** {}\n\
             📢 **Response Channel:** {}",
            invocation.guild_name.as_deref().unwrap_or("this server"),
            notify_role,
            admin_roles,
            command_channel,
            response_channel,
        )
    }

    // ========================================================================
    // Cashout form
    // ========================================================================

    /// Render a submitted cashout form and post it
    pub async fn handle_cashout_submission(
        &self,
        gateway: &dyn Gateway,
        submission: &CashoutSubmission,
    ) -> Reply {
        BotMetrics::record_form_submitted();

        let fields = submission.form.to_fields();
        let text = self.render(TemplateKind::Cashout, &fields, submission.guild_id);
        let settings = self.settings.get(submission.guild_id);

        let response_channel = match settings.response_channel_id {
            Some(channel_id) => {
                let resolved = gateway.resolve_channel(submission.guild_id, channel_id).await;
                if resolved.is_none() {
                    tracing::warn!(
                        guild_id = %submission.guild_id,
                        channel_id = %channel_id,
                        "Configured response channel no longer exists, posting in source channel"
                    );
                }
                resolved
            }
            None => None,
        };

        let target = response_channel
            .as_ref()
            .map(|channel| channel.id)
            .unwrap_or(submission.channel_id);

        if let Some(role) = settings.notify_role_id {
            self.send(gateway, target, &role.mention()).await;
        }

        if !self.send(gateway, target, &text).await {
            return Reply::Private(replies::delivery_failed(&target.mention()));
        }

        tracing::info!(
            guild_id = %submission.guild_id,
            channel_id = %target,
            channel = response_channel.as_ref().map(|c| c.name.as_str()).unwrap_or("source"),
            "Cashout posted"
        );

        match response_channel {
            Some(channel) => Reply::Private(replies::cashout_posted_in(&channel.mention())),
            None => Reply::private(replies::CASHOUT_POSTED),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn render(&self, kind: TemplateKind, fields: &FieldMap, guild_id: GuildId) -> String {
        BotMetrics::record_render(kind.name());
        self.engine.render(kind, fields, Some(guild_id))
    }

    /// Mention of the required command channel when `channel_id` is not it
    async fn command_channel_violation(
        &self,
        gateway: &dyn Gateway,
        guild_id: GuildId,
        channel_id: ChannelId,
        settings: &GuildSettings,
    ) -> Option<String> {
        let required = settings.command_channel_id?;
        if required == channel_id {
            return None;
        }

        let mention = gateway
            .resolve_channel(guild_id, required)
            .await
            .map(|channel| channel.mention())
            .unwrap_or_else(|| replies::DESIGNATED_CHANNEL.to_string());
        Some(mention)
    }

    async fn role_mention(&self, gateway: &dyn Gateway, guild_id: GuildId, role_id: RoleId) -> String {
        if gateway.role_exists(guild_id, role_id).await {
            role_id.mention()
        } else {
            format!("(deleted role {})", role_id)
        }
    }

    async fn channel_mention(
        &self,
        gateway: &dyn Gateway,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> String {
        match gateway.resolve_channel(guild_id, channel_id).await {
            Some(channel) => channel.mention(),
            None => format!("(deleted channel {})", channel_id),
        }
    }

    /// Send and report success; failures are logged, never retried
    async fn send(&self, gateway: &dyn Gateway, channel_id: ChannelId, text: &str) -> bool {
        match gateway.send_text(channel_id, text).await {
            Ok(()) => true,
            Err(e) => {
                BotMetrics::record_send_failure();
                tracing::warn!(error = %e, channel_id = %channel_id, "Failed to send message");
                false
            }
        }
    }
}
