//! End-to-end tests of the bot handlers
//!
//! These tests drive `BotHandler` through the in-memory gateway and settings
//! backend, without a Discord connection.

use std::sync::Arc;

use cashout_template_bot::bot::{
    replies, BotCommand, BotHandler, CashoutSubmission, CommandInvocation, Invoker, MentionEvent,
    MentionOutcome, Reply,
};
use cashout_template_bot::gateway::MemoryGateway;
use cashout_template_bot::guild::{
    GuildSettings, JsonFileBackend, MemoryBackend, SettingsBackend, SettingsDocument,
    SettingsStore,
};
use cashout_template_bot::ids::{ChannelId, GuildId, RoleId, UserId};
use cashout_template_bot::template::{CashoutForm, TemplateEngine};

const GUILD: GuildId = GuildId(1);
const BOT: UserId = UserId(99);
const GENERAL: ChannelId = ChannelId(10);
const COMMANDS: ChannelId = ChannelId(11);
const PAYOUTS: ChannelId = ChannelId(12);
const CASHIER: RoleId = RoleId(77);
const MODS: RoleId = RoleId(50);

struct TestEnvironment {
    backend: Arc<MemoryBackend>,
    store: Arc<SettingsStore>,
    bot: BotHandler,
}

fn create_test_environment(document: SettingsDocument) -> TestEnvironment {
    let backend = Arc::new(MemoryBackend::with_document(document));
    let (store, bot) = create_bot(backend.clone());
    TestEnvironment {
        backend,
        store,
        bot,
    }
}

fn create_bot(storage: Arc<dyn SettingsBackend>) -> (Arc<SettingsStore>, BotHandler) {
    let store = Arc::new(SettingsStore::load(storage).unwrap());
    let engine = Arc::new(TemplateEngine::new(store.clone()).unwrap());
    (store.clone(), BotHandler::new(engine, store))
}

fn configured(settings: GuildSettings) -> SettingsDocument {
    SettingsDocument::from([(GUILD, settings)])
}

fn mention(channel_id: ChannelId, content: &str) -> MentionEvent {
    MentionEvent {
        guild_id: GUILD,
        channel_id,
        content: content.to_string(),
        bot_user_id: BOT,
        bot_display_name: "CashoutBot".to_string(),
    }
}

fn invoke(invoker: Invoker, command: BotCommand) -> CommandInvocation {
    CommandInvocation {
        guild_id: GUILD,
        guild_name: Some("Lucky Spins".to_string()),
        channel_id: GENERAL,
        invoker,
        command,
    }
}

fn administrator() -> Invoker {
    Invoker {
        user_id: UserId(5),
        role_ids: vec![],
        is_platform_admin: true,
    }
}

fn member_with(roles: &[RoleId]) -> Invoker {
    Invoker {
        user_id: UserId(6),
        role_ids: roles.to_vec(),
        is_platform_admin: false,
    }
}

fn text(reply: Reply) -> String {
    reply.text().map(str::to_string).unwrap_or_default()
}

// ============================================================================
// Mentions
// ============================================================================

#[tokio::test]
async fn test_mention_posts_in_source_channel_without_response_channel() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    let outcome = env
        .bot
        .handle_mention(
            &gateway,
            &mention(GENERAL, "<@99> cashout\nMaria Lopez\n15\n$pablolose2\n100"),
        )
        .await;

    assert_eq!(outcome, MentionOutcome::Posted { channel_id: GENERAL });
    let sent = gateway.sent_to(GENERAL);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("**Player:** Maria Lopez"));
    assert!(sent[0].contains("**Deposited Amount:** 15"));
    assert!(sent[0].contains("**Tag:** $pablolose2"));
    assert!(sent[0].contains("**Redeemed Amount:** 100"));
    // Unfilled placeholders render empty
    assert!(sent[0].contains("**To pay:** \n"));
    assert!(!sent[0].contains('{'));
}

#[tokio::test]
async fn test_mention_routes_to_response_channel_with_confirmation() {
    let env = create_test_environment(configured(GuildSettings {
        response_channel_id: Some(PAYOUTS),
        notify_role_id: Some(CASHIER),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new().with_channel(GUILD, PAYOUTS, "payouts");

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@!99> Cashout\nMaria"))
        .await;

    assert_eq!(outcome, MentionOutcome::Posted { channel_id: PAYOUTS });
    let posted = gateway.sent_to(PAYOUTS);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains("\n<@&77>\n"));
    assert!(posted[0].contains("**Player:** Maria"));
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::template_posted("<#12>")]
    );
}

#[tokio::test]
async fn test_mention_in_wrong_channel_is_redirected() {
    let env = create_test_environment(configured(GuildSettings {
        command_channel_id: Some(COMMANDS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new().with_channel(GUILD, COMMANDS, "bot-commands");

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@99> cashout\nMaria"))
        .await;

    assert_eq!(outcome, MentionOutcome::WrongChannel);
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::use_command_channel("<#11>")]
    );
}

#[tokio::test]
async fn test_mention_with_deleted_command_channel_uses_generic_name() {
    let env = create_test_environment(configured(GuildSettings {
        command_channel_id: Some(COMMANDS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@99> help"))
        .await;

    assert_eq!(outcome, MentionOutcome::WrongChannel);
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::use_command_channel(replies::DESIGNATED_CHANNEL)]
    );
}

#[tokio::test]
async fn test_mention_help_in_command_channel() {
    let env = create_test_environment(configured(GuildSettings {
        command_channel_id: Some(COMMANDS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(COMMANDS, "<@99>   HELP please"))
        .await;

    assert_eq!(outcome, MentionOutcome::Help);
    let sent = gateway.sent_to(COMMANDS);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], env.bot.engine().help_text());
}

#[tokio::test]
async fn test_mention_with_unknown_template_lists_catalog() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@99> refund\nMaria"))
        .await;

    assert_eq!(outcome, MentionOutcome::UnknownTemplate);
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::unknown_template("cashout", "CashoutBot")]
    );
}

#[tokio::test]
async fn test_mention_with_deleted_response_channel() {
    let env = create_test_environment(configured(GuildSettings {
        response_channel_id: Some(PAYOUTS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@99> cashout\nMaria"))
        .await;

    assert_eq!(outcome, MentionOutcome::ResponseChannelMissing);
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::RESPONSE_CHANNEL_MISSING.to_string()]
    );
    assert!(gateway.sent_to(PAYOUTS).is_empty());
}

#[tokio::test]
async fn test_mention_delivery_failure_is_reported() {
    let env = create_test_environment(configured(GuildSettings {
        response_channel_id: Some(PAYOUTS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new()
        .with_channel(GUILD, PAYOUTS, "payouts")
        .failing_channel(PAYOUTS);

    let outcome = env
        .bot
        .handle_mention(&gateway, &mention(GENERAL, "<@99> cashout\nMaria"))
        .await;

    assert_eq!(outcome, MentionOutcome::DeliveryFailed);
    assert_eq!(
        gateway.sent_to(GENERAL),
        vec![replies::delivery_failed("<#12>")]
    );
}

// ============================================================================
// Slash commands
// ============================================================================

#[tokio::test]
async fn test_admin_command_denied_for_regular_member() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_command(
            &gateway,
            &invoke(member_with(&[MODS]), BotCommand::SetNotifyRole(CASHIER)),
        )
        .await;

    assert_eq!(reply, Reply::private(replies::PERMISSION_DENIED));
    assert_eq!(env.store.get(GUILD).notify_role_id, None);
    assert_eq!(env.backend.save_count(), 0);
}

#[tokio::test]
async fn test_configured_admin_role_grants_access() {
    let env = create_test_environment(configured(GuildSettings {
        admin_role_ids: vec![MODS],
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_command(
            &gateway,
            &invoke(member_with(&[RoleId(3), MODS]), BotCommand::SetResponseChannel(PAYOUTS)),
        )
        .await;

    assert_eq!(text(reply), replies::response_channel_set(PAYOUTS));
    assert_eq!(env.store.get(GUILD).response_channel_id, Some(PAYOUTS));
    assert_eq!(env.backend.saved()[&GUILD].response_channel_id, Some(PAYOUTS));
}

#[tokio::test]
async fn test_set_admin_roles_requires_platform_administrator() {
    let env = create_test_environment(configured(GuildSettings {
        admin_role_ids: vec![MODS],
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_command(
            &gateway,
            &invoke(member_with(&[MODS]), BotCommand::SetAdminRoles(vec![RoleId(3)])),
        )
        .await;

    assert_eq!(reply, Reply::private(replies::ADMINISTRATOR_REQUIRED));
    assert_eq!(env.store.get(GUILD).admin_role_ids, vec![MODS]);
}

#[tokio::test]
async fn test_set_admin_roles_deduplicates() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_command(
            &gateway,
            &invoke(
                administrator(),
                BotCommand::SetAdminRoles(vec![MODS, CASHIER, MODS]),
            ),
        )
        .await;

    assert_eq!(text(reply), replies::admin_roles_set(&[MODS, CASHIER]));
    assert_eq!(env.store.get(GUILD).admin_role_ids, vec![MODS, CASHIER]);
}

#[tokio::test]
async fn test_notify_role_lifecycle() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();
    let admin = || invoke(administrator(), BotCommand::RemoveNotifyRole);

    let removed_unset = env.bot.handle_command(&gateway, &admin()).await;
    assert_eq!(removed_unset, Reply::private(replies::NOTIFY_ROLE_NOT_SET));
    assert_eq!(env.store.guild_count(), 0);

    let set = env
        .bot
        .handle_command(
            &gateway,
            &invoke(administrator(), BotCommand::SetNotifyRole(CASHIER)),
        )
        .await;
    assert_eq!(text(set), replies::notify_role_set(CASHIER));

    let set_again = env
        .bot
        .handle_command(
            &gateway,
            &invoke(administrator(), BotCommand::SetNotifyRole(RoleId(78))),
        )
        .await;
    assert_eq!(set_again, Reply::private(replies::NOTIFY_ROLE_ALREADY_SET));
    assert_eq!(env.store.get(GUILD).notify_role_id, Some(CASHIER));

    let removed = env.bot.handle_command(&gateway, &admin()).await;
    assert_eq!(removed, Reply::private(replies::NOTIFY_ROLE_REMOVED));
    assert_eq!(env.store.get(GUILD).notify_role_id, None);

    let reset = env
        .bot
        .handle_command(
            &gateway,
            &invoke(administrator(), BotCommand::SetNotifyRole(RoleId(78))),
        )
        .await;
    assert_eq!(text(reset), replies::notify_role_set(RoleId(78)));
    assert_eq!(env.backend.saved()[&GUILD].notify_role_id, Some(RoleId(78)));
}

#[tokio::test]
async fn test_failed_save_is_rolled_back() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let storage: Arc<dyn SettingsBackend> =
        Arc::new(JsonFileBackend::new(blocker.join("settings.json")));
    let (store, bot) = create_bot(storage);
    let gateway = MemoryGateway::new();

    for _ in 0..2 {
        let reply = bot
            .handle_command(
                &gateway,
                &invoke(administrator(), BotCommand::SetNotifyRole(CASHIER)),
            )
            .await;
        // A retry hits the same save error, not the already-set guard
        assert_eq!(reply, Reply::private(replies::SAVE_FAILED));
    }

    assert_eq!(store.get(GUILD).notify_role_id, None);
    assert_eq!(store.guild_count(), 0);
}

#[tokio::test]
async fn test_bot_settings_view() {
    let env = create_test_environment(configured(GuildSettings {
        notify_role_id: Some(CASHIER),
        admin_role_ids: vec![MODS, RoleId(51)],
        command_channel_id: None,
        response_channel_id: Some(PAYOUTS),
    }));
    let gateway = MemoryGateway::new()
        .with_role(GUILD, CASHIER)
        .with_role(GUILD, MODS);

    let reply = env
        .bot
        .handle_command(&gateway, &invoke(administrator(), BotCommand::BotSettings))
        .await;
    let view = text(reply);

    assert!(view.starts_with("**Bot Settings for Lucky Spins:**"));
    assert!(view.contains("**Notify Role:** <@&77>"));
    assert!(view.contains("**Admin Roles:** <@&50>, (deleted role 51)"));
    assert!(view.contains("**Command Channel:** Any channel"));
    assert!(view.contains("**Response Channel:** (deleted channel 12)"));
}

#[tokio::test]
async fn test_public_commands_need_no_authorization() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();
    let member = || member_with(&[]);

    let help = env
        .bot
        .handle_command(&gateway, &invoke(member(), BotCommand::Help))
        .await;
    assert_eq!(text(help), env.bot.engine().help_text());

    let templates = env
        .bot
        .handle_command(&gateway, &invoke(member(), BotCommand::Templates))
        .await;
    assert!(text(templates).contains("• `cashout`"));

    let cashout = env
        .bot
        .handle_command(&gateway, &invoke(member(), BotCommand::Cashout))
        .await;
    assert_eq!(cashout, Reply::OpenCashoutForm);
}

#[tokio::test]
async fn test_cashout_command_outside_command_channel() {
    let env = create_test_environment(configured(GuildSettings {
        command_channel_id: Some(COMMANDS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new().with_channel(GUILD, COMMANDS, "bot-commands");

    let reply = env
        .bot
        .handle_command(&gateway, &invoke(member_with(&[]), BotCommand::Cashout))
        .await;

    assert_eq!(text(reply), replies::use_this_command_in("<#11>"));
}

#[tokio::test]
async fn test_unknown_slash_command_gets_a_reply() {
    let env = create_test_environment(SettingsDocument::new());

    let reply = env.bot.handle_unknown_command("deposit");

    assert_eq!(reply, Reply::private(replies::UNKNOWN_COMMAND));
}

#[tokio::test]
async fn test_help_text_command() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    assert!(
        env.bot
            .handle_text_command(&gateway, GENERAL, "!HELP_TEMPLATE")
            .await
    );
    assert_eq!(gateway.sent_to(GENERAL), vec![env.bot.engine().help_text()]);

    assert!(
        !env.bot
            .handle_text_command(&gateway, GENERAL, "<@99> cashout\nMaria")
            .await
    );
    assert!(!env.bot.handle_text_command(&gateway, GENERAL, "!help").await);
    assert_eq!(gateway.sent().len(), 1);
}

// ============================================================================
// Cashout form
// ============================================================================

fn submission(tip_and_game: &str) -> CashoutSubmission {
    CashoutSubmission {
        guild_id: GUILD,
        channel_id: GENERAL,
        form: CashoutForm {
            player_name: " Maria Lopez ".to_string(),
            cashtag: "$pablolose2".to_string(),
            loaded_amount: "$15".to_string(),
            redeemed_amount: "100".to_string(),
            tip_and_game: tip_and_game.to_string(),
        },
    }
}

#[tokio::test]
async fn test_form_submission_pings_role_then_posts() {
    let env = create_test_environment(configured(GuildSettings {
        notify_role_id: Some(CASHIER),
        response_channel_id: Some(PAYOUTS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new().with_channel(GUILD, PAYOUTS, "payouts");

    let reply = env
        .bot
        .handle_cashout_submission(&gateway, &submission("(10, 5)"))
        .await;

    assert_eq!(text(reply), replies::cashout_posted_in("<#12>"));
    let posted = gateway.sent_to(PAYOUTS);
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0], "<@&77>");
    assert!(posted[1].contains("**Player:** Maria Lopez"));
    assert!(posted[1].contains("**Deposited Amount:** 15"));
    assert!(posted[1].contains("**Tip:** 10"));
    assert!(posted[1].contains("**Post Redeem Game Load:** 5"));
    assert!(posted[1].contains("**To pay:** 85"));
}

#[tokio::test]
async fn test_form_submission_clamps_pay_amount() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_cashout_submission(&gateway, &submission("80, 40"))
        .await;

    assert_eq!(reply, Reply::private(replies::CASHOUT_POSTED));
    let posted = gateway.sent_to(GENERAL);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains("**To pay:** 0"));
}

#[tokio::test]
async fn test_form_submission_falls_back_to_source_channel() {
    let env = create_test_environment(configured(GuildSettings {
        response_channel_id: Some(PAYOUTS),
        ..Default::default()
    }));
    let gateway = MemoryGateway::new();

    let reply = env
        .bot
        .handle_cashout_submission(&gateway, &submission(""))
        .await;

    assert_eq!(reply, Reply::private(replies::CASHOUT_POSTED));
    let posted = gateway.sent_to(GENERAL);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains("**Tip:** \n"));
    assert!(posted[0].contains("**To pay:** 100"));
}

#[tokio::test]
async fn test_form_submission_delivery_failure() {
    let env = create_test_environment(SettingsDocument::new());
    let gateway = MemoryGateway::new().failing_channel(GENERAL);

    let reply = env
        .bot
        .handle_cashout_submission(&gateway, &submission(""))
        .await;

    assert_eq!(text(reply), replies::delivery_failed("<#10>"));
}
