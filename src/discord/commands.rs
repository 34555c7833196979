//! Slash command registration, parsing, and the cashout modal

use std::collections::HashMap;

use serenity::all::{
    ActionRow, ActionRowComponent, ChannelType, CommandData, CommandDataOption,
    CommandDataOptionValue, CommandOptionType, CreateActionRow, CreateCommand,
    CreateCommandOption, CreateInputText, CreateModal, InputTextStyle,
};

use crate::bot::{BotCommand, MAX_ADMIN_ROLES};
use crate::ids::{ChannelId, RoleId};
use crate::template::CashoutForm;

/// Custom id of the cashout modal
pub const CASHOUT_MODAL_ID: &str = "cashout_form";

const PLAYER_NAME_INPUT: &str = "player_name";
const CASHTAG_INPUT: &str = "cashtag";
const LOADED_AMOUNT_INPUT: &str = "loaded_amount";
const REDEEMED_AMOUNT_INPUT: &str = "redeemed_amount";
const TIP_AND_GAME_INPUT: &str = "tip_and_game";

const ORDINALS: [&str; MAX_ADMIN_ROLES] = ["First", "Second", "Third", "Fourth", "Fifth"];

/// Every slash command the bot registers
pub fn command_definitions() -> Vec<CreateCommand> {
    let mut set_admin_roles = CreateCommand::new(BotCommand::SET_ADMIN_ROLES)
        .description("Set which roles are allowed to use bot admin commands");
    for (i, ordinal) in ORDINALS.iter().enumerate() {
        let description = if i == 0 {
            format!("{} admin role", ordinal)
        } else {
            format!("{} admin role (optional)", ordinal)
        };
        set_admin_roles = set_admin_roles.add_option(
            CreateCommandOption::new(CommandOptionType::Role, format!("role{}", i + 1), description)
                .required(i == 0),
        );
    }

    vec![
        CreateCommand::new(BotCommand::CASHOUT)
            .description("Open a form to generate a cashout template"),
        CreateCommand::new(BotCommand::HELP).description("Show bot help and usage instructions"),
        CreateCommand::new(BotCommand::TEMPLATES).description("List all available templates"),
        CreateCommand::new(BotCommand::BOT_SETTINGS)
            .description("View current bot settings for this server"),
        set_admin_roles,
        CreateCommand::new(BotCommand::SET_NOTIFY_ROLE)
            .description("Set the role to mention for cashout notifications")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Role,
                    "role",
                    "Role to mention in cashout messages",
                )
                .required(true),
            ),
        CreateCommand::new(BotCommand::REMOVE_NOTIFY_ROLE)
            .description("Remove the automatic role mention from cashout messages"),
        CreateCommand::new(BotCommand::SET_COMMAND_CHANNEL)
            .description("Set the channel where bot listens for commands")
            .add_option(channel_option("Channel for commands")),
        CreateCommand::new(BotCommand::SET_RESPONSE_CHANNEL)
            .description("Set the channel where cashout templates are posted")
            .add_option(channel_option("Channel for cashout templates")),
    ]
}

fn channel_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Channel, "channel", description)
        .channel_types(vec![ChannelType::Text])
        .required(true)
}

fn role_option(options: &[CommandDataOption], name: &str) -> Option<RoleId> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            CommandDataOptionValue::Role(id) => Some(RoleId(id.get())),
            _ => None,
        })
}

fn channel_option_value(options: &[CommandDataOption], name: &str) -> Option<ChannelId> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            CommandDataOptionValue::Channel(id) => Some(ChannelId(id.get())),
            _ => None,
        })
}

/// Translate an incoming slash command; `None` for unknown commands or
/// missing required options
pub fn parse_command(data: &CommandData) -> Option<BotCommand> {
    let options = &data.options;

    let command = match data.name.as_str() {
        BotCommand::CASHOUT => BotCommand::Cashout,
        BotCommand::HELP => BotCommand::Help,
        BotCommand::TEMPLATES => BotCommand::Templates,
        BotCommand::BOT_SETTINGS => BotCommand::BotSettings,
        BotCommand::SET_ADMIN_ROLES => BotCommand::SetAdminRoles(
            (1..=MAX_ADMIN_ROLES)
                .filter_map(|i| role_option(options, &format!("role{}", i)))
                .collect(),
        ),
        BotCommand::SET_NOTIFY_ROLE => BotCommand::SetNotifyRole(role_option(options, "role")?),
        BotCommand::REMOVE_NOTIFY_ROLE => BotCommand::RemoveNotifyRole,
        BotCommand::SET_COMMAND_CHANNEL => {
            BotCommand::SetCommandChannel(channel_option_value(options, "channel")?)
        }
        BotCommand::SET_RESPONSE_CHANNEL => {
            BotCommand::SetResponseChannel(channel_option_value(options, "channel")?)
        }
        _ => return None,
    };

    Some(command)
}

fn text_input(
    label: &str,
    custom_id: &str,
    placeholder: &str,
    required: bool,
    max_length: u16,
) -> CreateActionRow {
    CreateActionRow::InputText(
        CreateInputText::new(InputTextStyle::Short, label, custom_id)
            .placeholder(placeholder)
            .required(required)
            .max_length(max_length),
    )
}

/// The cashout form shown by `/cashout`
pub fn cashout_modal() -> CreateModal {
    CreateModal::new(CASHOUT_MODAL_ID, "Cashout Details").components(vec![
        text_input("Player Name", PLAYER_NAME_INPUT, "e.g. Maria Lopez", true, 64),
        text_input("Cashtag", CASHTAG_INPUT, "e.g. $pablolose2", true, 64),
        text_input("Loaded Amount", LOADED_AMOUNT_INPUT, "e.g. 15", true, 16),
        text_input("Redeemed Amount", REDEEMED_AMOUNT_INPUT, "e.g. 100", true, 16),
        text_input(
            "Optional: Tip, Game Load",
            TIP_AND_GAME_INPUT,
            "Format: (Tip, Game Load)",
            false,
            32,
        ),
    ])
}

/// Collect submitted modal inputs into a form
pub fn parse_cashout_form(rows: &[ActionRow]) -> CashoutForm {
    let mut values: HashMap<&str, String> = HashMap::new();
    for row in rows {
        for component in &row.components {
            if let ActionRowComponent::InputText(input) = component {
                values.insert(
                    input.custom_id.as_str(),
                    input.value.clone().unwrap_or_default(),
                );
            }
        }
    }

    let mut take = |id: &str| values.remove(id).unwrap_or_default();

    CashoutForm {
        player_name: take(PLAYER_NAME_INPUT),
        cashtag: take(CASHTAG_INPUT),
        loaded_amount: take(LOADED_AMOUNT_INPUT),
        redeemed_amount: take(REDEEMED_AMOUNT_INPUT),
        tip_and_game: take(TIP_AND_GAME_INPUT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bot_command_is_registered() {
        let definitions = command_definitions();
        assert_eq!(definitions.len(), 9);
    }
}
