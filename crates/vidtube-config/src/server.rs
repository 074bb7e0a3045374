use crate::{ConfigError, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
    /// Limit for JSON and other buffered bodies, in bytes
    pub json_body_limit: usize,
    /// Limit for multipart upload bodies, in bytes
    pub upload_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            metrics_port: 9090,
            json_body_limit: 20 * 1024,
            upload_body_limit: 100 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_or("PORT", defaults.port)?,
            metrics_port: parse_or("METRICS_PORT", defaults.metrics_port)?,
            json_body_limit: parse_or("JSON_BODY_LIMIT", defaults.json_body_limit)?,
            upload_body_limit: parse_or("UPLOAD_BODY_LIMIT", defaults.upload_body_limit)?,
        })
    }
}
