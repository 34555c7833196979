use prometheus::{Encoder, TextEncoder};

use super::{
    AUTHORIZATION_DENIED_TOTAL, COMMANDS_TOTAL, FORMS_SUBMITTED_TOTAL, GUILDS_CONFIGURED,
    MENTIONS_TOTAL, SEND_FAILURES_TOTAL, SETTINGS_MUTATIONS_TOTAL, TEMPLATES_RENDERED_TOTAL,
};

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording bot metrics
pub struct BotMetrics;

impl BotMetrics {
    pub fn record_mention(outcome: &str) {
        MENTIONS_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn record_command(command: &str) {
        COMMANDS_TOTAL.with_label_values(&[command]).inc();
    }

    pub fn record_form_submitted() {
        FORMS_SUBMITTED_TOTAL.inc();
    }

    pub fn record_render(template: &str) {
        TEMPLATES_RENDERED_TOTAL.with_label_values(&[template]).inc();
    }

    pub fn record_settings_mutation(setting: &str, success: bool) {
        let result = if success { "ok" } else { "rejected" };
        SETTINGS_MUTATIONS_TOTAL
            .with_label_values(&[setting, result])
            .inc();
    }

    pub fn record_authorization_denied() {
        AUTHORIZATION_DENIED_TOTAL.inc();
    }

    pub fn record_send_failure() {
        SEND_FAILURES_TOTAL.inc();
    }

    pub fn set_guilds_configured(count: usize) {
        GUILDS_CONFIGURED.set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_recorded_metrics() {
        BotMetrics::record_command("help");
        BotMetrics::record_render("cashout");

        let output = encode_metrics().unwrap();
        assert!(output.contains("cashout_bot_commands_total"));
        assert!(output.contains("cashout_bot_templates_rendered_total"));
    }
}
