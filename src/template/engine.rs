//! Template catalog and rendering

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::guild::SettingsStore;
use crate::ids::{GuildId, UserId};

use super::parser::parse_free_text;
use super::substitution::substitute_placeholders;
use super::types::{
    FieldMap, ParsedMessage, Template, TemplateError, TemplateKind, TemplateResult,
    ROLE_MENTION_PLACEHOLDER,
};

const CASHOUT_BODY: &str = "\
🔔 **CASHOUT**
═══════════════════
{role_mention}

**Player:** {playerName}
**Deposited Amount:** {loadedAmount}
**Tag:** {cashtag}
**Redeemed Amount:** {redeemedAmount}
**Tip:** {tip}
**Post Redeem Game Load:** {gameLoad}

**To pay:** {payAmount}
═══════════════════";

const CASHOUT_FIELDS: [&str; 7] = [
    "playerName",
    "loadedAmount",
    "cashtag",
    "redeemedAmount",
    "tip",
    "gameLoad",
    "payAmount",
];

/// The templates shipped with the bot
pub fn builtin_templates() -> TemplateResult<Vec<Template>> {
    Ok(vec![Template::new(
        TemplateKind::Cashout,
        "For cashout notifications",
        CASHOUT_BODY,
        &CASHOUT_FIELDS,
    )?])
}

/// Holds the template catalog and turns input into notification text.
///
/// The engine only ever reads server settings (to resolve `{role_mention}`).
pub struct TemplateEngine {
    templates: BTreeMap<TemplateKind, Template>,
    settings: Arc<SettingsStore>,
}

impl TemplateEngine {
    /// Create an engine with the built-in catalog
    pub fn new(settings: Arc<SettingsStore>) -> TemplateResult<Self> {
        Self::with_templates(builtin_templates()?, settings)
    }

    /// Create an engine with a custom catalog
    pub fn with_templates(
        templates: Vec<Template>,
        settings: Arc<SettingsStore>,
    ) -> TemplateResult<Self> {
        let mut catalog = BTreeMap::new();
        for template in templates {
            let kind = template.kind;
            if catalog.insert(kind, template).is_some() {
                return Err(TemplateError::DuplicateTemplate(kind));
            }
        }

        Ok(Self {
            templates: catalog,
            settings,
        })
    }

    pub fn get(&self, kind: TemplateKind) -> Option<&Template> {
        self.templates.get(&kind)
    }

    /// Look up a template by its (case-insensitive) name
    pub fn lookup(&self, name: &str) -> Option<&Template> {
        TemplateKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn template_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.keys().map(|kind| kind.name())
    }

    /// Parse a mention message; `None` means no known template was named.
    pub fn parse_free_text(&self, text: &str, bot_user_id: UserId) -> Option<ParsedMessage> {
        parse_free_text(self.templates.values(), text, bot_user_id)
    }

    /// Fill a template. Missing or empty fields render as empty strings and
    /// `{role_mention}` falls back to the server's notify role.
    pub fn render(&self, kind: TemplateKind, fields: &FieldMap, guild_id: Option<GuildId>) -> String {
        let Some(template) = self.get(kind) else {
            tracing::warn!(template = %kind, "Render requested for unregistered template");
            return String::new();
        };

        let mut values = HashMap::with_capacity(template.placeholders().len());
        for placeholder in template.placeholders() {
            let value = match fields.get(placeholder) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => self.resolve_implicit(placeholder, guild_id),
            };
            values.insert(placeholder.clone(), value);
        }

        substitute_placeholders(&template.body, &values)
    }

    fn resolve_implicit(&self, placeholder: &str, guild_id: Option<GuildId>) -> String {
        match (placeholder, guild_id) {
            (ROLE_MENTION_PLACEHOLDER, Some(guild_id)) => self
                .settings
                .get(guild_id)
                .notify_role_id
                .map(|role| role.mention())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Bullet list of template names
    pub fn list_templates(&self) -> String {
        self.templates
            .values()
            .map(|t| format!("• `{}`", t.name()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Usage description shown for `help`
    pub fn help_text(&self) -> String {
        let mut help = String::from(
            "🤖 **Template Bot Help**\n\n\
             **Usage:** Mention the bot followed by the template name and values (one per line).\n\n\
             **Available Templates:**\n",
        );

        for template in self.templates.values() {
            help.push_str(&format!("• `{}` - {}\n", template.name(), template.title));
        }

        for template in self.templates.values() {
            help.push_str(&format!("\n**Format for {}:**\n", template.name()));
            help.push_str(&format!("1. Mention the bot + \"{}\"\n", template.name()));
            for (i, field) in template.fields.iter().enumerate() {
                help.push_str(&format!("{}. {}\n", i + 2, field));
            }
        }

        help.push_str(
            "\nFields are filled in order - no need to specify field names! \
             Use `/cashout` for a guided form.\n\n\
             **Admin Commands:**\n\
             • `/set_admin_roles` - Choose which roles may use admin commands\n\
             • `/set_notify_role @RoleName` - Set role to mention automatically\n\
             • `/remove_notify_role` - Remove automatic role mention\n\
             • `/set_command_channel #channel` - Only accept requests in one channel\n\
             • `/set_response_channel #channel` - Post notifications in one channel\n\
             • `/bot_settings` - View current settings",
        );

        help
    }
}
