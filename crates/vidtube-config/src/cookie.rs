use crate::{ConfigError, parse_flag};

/// Attributes applied to the `accessToken` and `refreshToken` cookies.
///
/// Session cookies are always `HttpOnly`. `secure` defaults to on and should
/// only be disabled for plain-HTTP local development.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieConfig {
    pub secure: bool,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secure: parse_flag("COOKIE_SECURE", true)?,
            ..Self::default()
        })
    }
}
