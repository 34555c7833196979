//! Slash command surface

use crate::ids::{ChannelId, RoleId};

/// Prefixed text command that prints the help text
pub const HELP_TEXT_COMMAND: &str = "!help_template";

/// Most roles `/set_admin_roles` accepts in one call
pub const MAX_ADMIN_ROLES: usize = 5;

/// Every command the bot answers, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Open the cashout form
    Cashout,
    Help,
    Templates,
    /// Show the server's current settings
    BotSettings,
    SetAdminRoles(Vec<RoleId>),
    SetNotifyRole(RoleId),
    RemoveNotifyRole,
    SetCommandChannel(ChannelId),
    SetResponseChannel(ChannelId),
}

impl BotCommand {
    pub const CASHOUT: &'static str = "cashout";
    pub const HELP: &'static str = "help";
    pub const TEMPLATES: &'static str = "templates";
    pub const BOT_SETTINGS: &'static str = "bot_settings";
    pub const SET_ADMIN_ROLES: &'static str = "set_admin_roles";
    pub const SET_NOTIFY_ROLE: &'static str = "set_notify_role";
    pub const REMOVE_NOTIFY_ROLE: &'static str = "remove_notify_role";
    pub const SET_COMMAND_CHANNEL: &'static str = "set_command_channel";
    pub const SET_RESPONSE_CHANNEL: &'static str = "set_response_channel";

    /// Registered command name
    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Cashout => Self::CASHOUT,
            BotCommand::Help => Self::HELP,
            BotCommand::Templates => Self::TEMPLATES,
            BotCommand::BotSettings => Self::BOT_SETTINGS,
            BotCommand::SetAdminRoles(_) => Self::SET_ADMIN_ROLES,
            BotCommand::SetNotifyRole(_) => Self::SET_NOTIFY_ROLE,
            BotCommand::RemoveNotifyRole => Self::REMOVE_NOTIFY_ROLE,
            BotCommand::SetCommandChannel(_) => Self::SET_COMMAND_CHANNEL,
            BotCommand::SetResponseChannel(_) => Self::SET_RESPONSE_CHANNEL,
        }
    }

    /// Whether the command needs the server's admin authorization
    /// (`SetAdminRoles` instead needs platform administrator rights)
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            BotCommand::BotSettings
                | BotCommand::SetNotifyRole(_)
                | BotCommand::RemoveNotifyRole
                | BotCommand::SetCommandChannel(_)
                | BotCommand::SetResponseChannel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(BotCommand::Cashout.name(), "cashout");
        assert_eq!(BotCommand::SetAdminRoles(vec![]).name(), "set_admin_roles");
        assert_eq!(BotCommand::SetNotifyRole(RoleId(1)).name(), "set_notify_role");
    }

    #[test]
    fn test_admin_gating() {
        assert!(BotCommand::BotSettings.requires_admin());
        assert!(BotCommand::RemoveNotifyRole.requires_admin());
        assert!(!BotCommand::Help.requires_admin());
        assert!(!BotCommand::Cashout.requires_admin());
        assert!(!BotCommand::SetAdminRoles(vec![RoleId(1)]).requires_admin());
    }
}
