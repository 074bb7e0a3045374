use crate::{ConfigError, optional, parse_flag};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
    /// OTLP gRPC endpoint; trace export is skipped when unset
    pub otlp_endpoint: Option<String>,
    pub log_dir: String,
    pub environment: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            otlp_endpoint: None,
            log_dir: "storage/logs".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            metrics_enabled: parse_flag("OBSERVABILITY_ENABLED", defaults.metrics_enabled)?,
            otlp_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
            log_dir: optional("LOG_DIR").unwrap_or(defaults.log_dir),
            environment: optional("ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }
}
