//! User-facing reply text

use crate::ids::{ChannelId, RoleId};

pub const PERMISSION_DENIED: &str = "❌ You do not have permission to use this command.";
pub const ADMINISTRATOR_REQUIRED: &str =
    "❌ You need **Administrator** permissions to set admin roles.";
pub const NO_ADMIN_ROLES: &str = "❌ Provide at least one role.";
pub const NOTIFY_ROLE_ALREADY_SET: &str =
    "❌ Notify Role already set! Clear using command `/remove_notify_role` to set a new one.";
pub const NOTIFY_ROLE_NOT_SET: &str = "❌ No notification role is currently set.";
pub const NOTIFY_ROLE_REMOVED: &str = "✅ Automatic role mention removed.";
pub const SAVE_FAILED: &str = "❌ Could not save settings. Please try again later.";
pub const RESPONSE_CHANNEL_MISSING: &str =
    "❌ Response channel not found. Please contact an admin.";
pub const CASHOUT_POSTED: &str = "✅ Cashout posted.";
pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Use `/help` to see what the bot can do.";
pub const DESIGNATED_CHANNEL: &str = "the designated channel";

pub fn use_command_channel(channel_mention: &str) -> String {
    format!("❌ Please use commands in {}", channel_mention)
}

pub fn use_this_command_in(channel_mention: &str) -> String {
    format!("❌ Please use this command in {}", channel_mention)
}

pub fn unknown_template(available: &str, bot_display_name: &str) -> String {
    format!(
        "❌ Template not found or invalid format.\n\n\
         Available templates: {}\n\
         Type '@{} help' for usage instructions.",
        available, bot_display_name
    )
}

pub fn template_posted(channel_mention: &str) -> String {
    format!("✅ Template posted in {}", channel_mention)
}

pub fn cashout_posted_in(channel_mention: &str) -> String {
    format!("✅ Cashout posted in {}", channel_mention)
}

pub fn delivery_failed(channel_mention: &str) -> String {
    format!("❌ Could not post in {}. Please contact an admin.", channel_mention)
}

pub fn admin_roles_set(roles: &[RoleId]) -> String {
    let mentions: Vec<String> = roles.iter().map(|r| r.mention()).collect();
    format!("✅ Admin roles set: {}", mentions.join(", "))
}

pub fn notify_role_set(role: RoleId) -> String {
    format!("✅ Notification role set to {}", role.mention())
}

pub fn command_channel_set(channel: ChannelId) -> String {
    format!("✅ Command channel set to {}", channel.mention())
}

pub fn response_channel_set(channel: ChannelId) -> String {
    format!("✅ Response channel set to {}", channel.mention())
}

pub fn template_list(list: &str) -> String {
    format!(
        "**Available Templates:**\n{}\n\nUse `/cashout` to create a cashout template!",
        list
    )
}
