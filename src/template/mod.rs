//! Notification template system.
//!
//! This module provides:
//! - Template definitions with `{field}` placeholders and ordered positional fields
//! - Free-text parsing of mention messages into field maps
//! - A single-pass substitution engine for rendering templates
//! - Numeric normalization for the structured cashout form
//!
//! # Example
//!
//! ```ignore
//! let engine = TemplateEngine::new(settings_store)?;
//!
//! let parsed = engine
//!     .parse_free_text("<@123> cashout\nMaria\n15\n$maria", UserId(123))
//!     .expect("known template");
//!
//! let text = engine.render(parsed.kind, &parsed.fields, Some(guild_id));
//! ```

mod amounts;
mod engine;
mod parser;
mod substitution;
mod types;

pub use amounts::{parse_amount, parse_tip_and_game, pay_amount, CashoutForm};
pub use engine::{builtin_templates, TemplateEngine};
pub use parser::{parse_free_text, strip_bot_mentions, template_name_candidate};
pub use substitution::{extract_placeholders, substitute_placeholders};
pub use types::{
    FieldMap, ParsedMessage, Template, TemplateError, TemplateKind, TemplateResult,
    ROLE_MENTION_PLACEHOLDER,
};
