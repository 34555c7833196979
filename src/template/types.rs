//! Template types and error definitions

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use super::substitution::extract_placeholders;

/// Placeholder resolved from the server's notify role rather than field data
pub const ROLE_MENTION_PLACEHOLDER: &str = "role_mention";

/// Field name to value mapping fed into a template
pub type FieldMap = BTreeMap<String, String>;

/// Template-specific error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template {template} declares field '{field}' more than once")]
    DuplicateField { template: TemplateKind, field: String },

    #[error("Template {0} is registered more than once")]
    DuplicateTemplate(TemplateKind),

    #[error("Invalid template {template}: {reason}")]
    InvalidTemplate { template: TemplateKind, reason: String },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Every template the bot knows about. The lowercase name is the dispatch key
/// users type after mentioning the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    Cashout,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 1] = [TemplateKind::Cashout];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Cashout => "cashout",
        }
    }

    /// Look up a template by its dispatch key. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A notification template definition
#[derive(Debug, Clone)]
pub struct Template {
    pub kind: TemplateKind,

    /// Short description shown in help and listings
    pub title: String,

    /// Text with `{identifier}` placeholders
    pub body: String,

    /// Positional field names; line N of a free-text message fills `fields[N]`
    pub fields: Vec<String>,

    placeholders: Vec<String>,
}

impl Template {
    /// Build a template, extracting its placeholder set once up front.
    pub fn new(
        kind: TemplateKind,
        title: impl Into<String>,
        body: impl Into<String>,
        fields: &[&str],
    ) -> TemplateResult<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate {
                template: kind,
                reason: "body must not be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for field in fields {
            if !seen.insert(*field) {
                return Err(TemplateError::DuplicateField {
                    template: kind,
                    field: field.to_string(),
                });
            }
        }

        let placeholders = extract_placeholders(&body);

        Ok(Self {
            kind,
            title: title.into(),
            body,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            placeholders,
        })
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Distinct placeholder names in order of first appearance in the body
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Placeholders that no positional field fills (e.g. `role_mention`)
    pub fn implicit_placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders
            .iter()
            .filter(|p| !self.fields.contains(p))
            .map(String::as_str)
    }
}

/// Outcome of parsing a free-text mention that named a known template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub kind: TemplateKind,
    pub fields: FieldMap,
}
