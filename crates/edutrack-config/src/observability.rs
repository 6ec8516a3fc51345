use std::env;

use crate::env_flag;

#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Installs the Prometheus recorder and serves `/metrics`
    pub metrics_enabled: bool,
    pub log_dir: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            metrics_enabled: env_flag("OBSERVABILITY_ENABLED", true),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string()),
        }
    }
}
