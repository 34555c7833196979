//! Positional free-text parsing of mention messages.
//!
//! A mention message looks like:
//!
//! ```text
//! @Bot cashout
//! Maria
//! 15
//! $maria
//! ```
//!
//! The first word after the mention names the template and each following
//! non-empty line fills the next declared field.

use crate::ids::UserId;

use super::types::{FieldMap, ParsedMessage, Template};

/// Remove every mention of `bot_user_id` and trim the result
pub fn strip_bot_mentions(text: &str, bot_user_id: UserId) -> String {
    let mut stripped = text.to_string();
    for token in bot_user_id.mention_tokens() {
        stripped = stripped.replace(&token, "");
    }
    stripped.trim().to_string()
}

/// Lower-cased first word of the first line, if any
pub fn template_name_candidate(text: &str) -> Option<String> {
    let first_line = text.lines().next()?;
    first_line.split_whitespace().next().map(str::to_lowercase)
}

/// Split everything after the first line into trimmed, non-empty values
pub fn positional_values(text: &str) -> Vec<&str> {
    match text.split_once('\n') {
        Some((_, rest)) => rest
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Map positional values onto a template's declared fields.
///
/// Values beyond the declared field count are dropped; fields without a
/// value are simply absent from the map.
pub fn assign_positional(template: &Template, values: &[&str]) -> FieldMap {
    template
        .fields
        .iter()
        .zip(values.iter())
        .map(|(field, value)| (field.clone(), value.to_string()))
        .collect()
}

/// Parse a mention message against a set of templates.
///
/// Returns `None` when the first word does not name a known template.
pub fn parse_free_text<'a, I>(templates: I, text: &str, bot_user_id: UserId) -> Option<ParsedMessage>
where
    I: IntoIterator<Item = &'a Template>,
{
    let text = strip_bot_mentions(text, bot_user_id);
    let candidate = template_name_candidate(&text)?;

    let template = templates
        .into_iter()
        .find(|template| template.name() == candidate)?;

    let values = positional_values(&text);
    Some(ParsedMessage {
        kind: template.kind,
        fields: assign_positional(template, &values),
    })
}
