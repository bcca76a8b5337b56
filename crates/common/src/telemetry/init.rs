use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::TelemetryConfig;

/// Initialize the tracing subscriber.
///
/// RUST_LOG wins when set; otherwise the configured log level is used.
/// JSON output carries the current span and span list so request-scoped
/// fields (user_id, transfer_id, ...) appear on every line.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_logs {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_list(true)
            .with_current_span(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "resido");
        assert_eq!(config.log_level, "info");
        assert!(config.json_logs);
    }

    #[test]
    fn test_init_telemetry_is_idempotent_safe() {
        let config = TelemetryConfig::default();
        // First init may succeed or fail depending on test ordering; the
        // second must not panic either way.
        let _ = init_telemetry(&config);
        let _ = init_telemetry(&config);
    }
}
