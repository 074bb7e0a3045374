//! # Vidtube Config
//!
//! Configuration for the Vidtube API, read from the environment once at
//! startup and passed by reference from then on.
//!
//! - [`jwt`]: access/refresh token secrets and lifetimes
//! - [`cookie`]: session cookie attributes
//! - [`cors`]: allowed browser origins
//! - [`media`]: Cloudinary credentials and upload staging directories
//! - [`server`]: ports and request body limits
//! - [`observability`]: metrics, log files and trace export
//!
//! # Example
//!
//! ```ignore
//! use vidtube_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("listening on {}", config.server.port);
//! ```

pub mod cookie;
pub mod cors;
pub mod jwt;
pub mod media;
pub mod observability;
pub mod server;

use std::env;
use std::str::FromStr;

use thiserror::Error;

pub use cookie::CookieConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use media::{CloudinaryConfig, MediaConfig};
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,
}

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub cors: CorsConfig,
    pub media: MediaConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            cookie: CookieConfig::from_env()?,
            cors: CorsConfig::from_env(),
            media: MediaConfig::from_env(),
            observability: ObservabilityConfig::from_env()?,
        })
    }
}

pub(crate) fn require(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

/// Reads a variable, treating empty values as unset.
pub(crate) fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

pub(crate) fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional(key) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: raw,
                reason: "expected true or false".to_string(),
            }),
        },
    }
}
