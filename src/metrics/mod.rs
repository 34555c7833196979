//! Prometheus metrics for the bot.
//!
//! This module provides metrics for monitoring the bot:
//! - Mention handling outcomes
//! - Templates rendered
//! - Slash commands by name
//! - Settings mutations and authorization denials
//! - Outbound send failures

mod helpers;

pub use helpers::{encode_metrics, BotMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "cashout_bot";

lazy_static! {
    // ============================================================================
    // Request Metrics
    // ============================================================================

    /// Mention messages handled, by outcome
    pub static ref MENTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_mentions_total", METRIC_PREFIX),
        "Total mention messages handled",
        &["outcome"]
    ).unwrap();

    /// Slash command invocations, by command name
    pub static ref COMMANDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_commands_total", METRIC_PREFIX),
        "Total slash command invocations",
        &["command"]
    ).unwrap();

    /// Cashout form submissions
    pub static ref FORMS_SUBMITTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_forms_submitted_total", METRIC_PREFIX),
        "Total cashout form submissions"
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Templates rendered, by template name
    pub static ref TEMPLATES_RENDERED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_templates_rendered_total", METRIC_PREFIX),
        "Total templates rendered",
        &["template"]
    ).unwrap();

    // ============================================================================
    // Settings Metrics
    // ============================================================================

    /// Settings mutations, by setting and result
    pub static ref SETTINGS_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_settings_mutations_total", METRIC_PREFIX),
        "Total settings mutations",
        &["setting", "result"]
    ).unwrap();

    /// Admin commands rejected for lack of permission
    pub static ref AUTHORIZATION_DENIED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_authorization_denied_total", METRIC_PREFIX),
        "Total admin commands denied"
    ).unwrap();

    /// Servers with a stored settings record
    pub static ref GUILDS_CONFIGURED: IntGauge = register_int_gauge!(
        format!("{}_guilds_configured", METRIC_PREFIX),
        "Number of servers with stored settings"
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Outbound messages that could not be delivered
    pub static ref SEND_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_send_failures_total", METRIC_PREFIX),
        "Total outbound message send failures"
    ).unwrap();
}
