use serde::{Deserialize, Serialize};

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to emitted logs
    pub service_name: String,
    /// Log level filter used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON-formatted logs (plain text otherwise)
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "resido".to_string(),
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}
