//! Token signing configuration.
//!
//! Access and refresh tokens are signed with independent secrets and carry
//! independent lifetimes. Lifetimes accept plain seconds (`900`) or
//! humantime strings (`15m`, `1d`, `10days`).

use std::fmt;
use std::time::Duration;

use crate::{ConfigError, optional};

const DEV_ACCESS_SECRET: &str = "dev-access-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-change-in-production";
const DEFAULT_ACCESS_EXPIRY: &str = "1d";
const DEFAULT_REFRESH_EXPIRY: &str = "10d";

#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_token_expiry: Duration,
        refresh_token_expiry: Duration,
    ) -> Result<Self, ConfigError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret == refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_expiry: access_token_expiry.as_secs() as i64,
            refresh_token_expiry: refresh_token_expiry.as_secs() as i64,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = optional("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set, using development secret");
            DEV_ACCESS_SECRET.to_string()
        });
        let refresh_secret = optional("REFRESH_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set, using development secret");
            DEV_REFRESH_SECRET.to_string()
        });

        let access_raw =
            optional("ACCESS_TOKEN_EXPIRY").unwrap_or_else(|| DEFAULT_ACCESS_EXPIRY.to_string());
        let refresh_raw =
            optional("REFRESH_TOKEN_EXPIRY").unwrap_or_else(|| DEFAULT_REFRESH_EXPIRY.to_string());

        Self::new(
            access_secret,
            refresh_secret,
            parse_expiry("ACCESS_TOKEN_EXPIRY", &access_raw)?,
            parse_expiry("REFRESH_TOKEN_EXPIRY", &refresh_raw)?,
        )
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

/// Parses a token lifetime given as seconds or a humantime duration.
pub fn parse_expiry(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let raw = raw.trim();

    let duration = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw).map_err(|e| ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })?,
    };

    if duration.is_zero() {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "lifetime must be positive".to_string(),
        });
    }

    Ok(duration)
}
