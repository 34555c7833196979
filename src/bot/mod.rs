//! Platform-neutral bot logic.
//!
//! This module provides:
//! - Inbound event types (mentions, slash commands, form submissions)
//! - The slash command surface
//! - `BotHandler`, which applies channel restrictions and authorization,
//!   renders templates and routes the result to the response channel
//!
//! Replies never surface errors: unknown templates, permission problems and
//! missing channels all become user-facing text.

mod commands;
mod events;
mod handler;
pub mod replies;

pub use commands::{BotCommand, HELP_TEXT_COMMAND, MAX_ADMIN_ROLES};
pub use events::{
    CashoutSubmission, CommandInvocation, Invoker, MentionEvent, MentionOutcome, Reply,
};
pub use handler::BotHandler;
