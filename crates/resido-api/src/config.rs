use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page size used when a list request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound a caller-provided page size is clamped to
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Prefix of generated bank-transfer reference codes
    #[serde(default = "default_reference_code_prefix")]
    pub reference_code_prefix: String,

    /// Master switch for the outbound email channel
    #[serde(default = "default_email_enabled")]
    pub email_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    100
}

fn default_reference_code_prefix() -> String {
    "TRF".to_string()
}

fn default_email_enabled() -> bool {
    true
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("RESIDO"))
            .build()?
            .try_deserialize()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            reference_code_prefix: default_reference_code_prefix(),
            email_enabled: default_email_enabled(),
        }
    }
}
