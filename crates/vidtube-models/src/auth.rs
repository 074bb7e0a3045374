//! Login, refresh and logout DTOs.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::users::User;

/// Login with username or email plus password.
#[derive(Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "require_identifier"))]
pub struct LoginRequest {
    #[schema(example = "chaiaurcode")]
    pub username: Option<String>,
    #[schema(example = "chai@example.com")]
    pub email: Option<String>,
    #[validate(custom(function = "vidtube_core::validation::not_blank"))]
    #[schema(example = "password123")]
    pub password: String,
}

impl LoginRequest {
    /// Trimmed, lowercased identifiers; blank values become `None`.
    pub fn identifiers(&self) -> (Option<String>, Option<String>) {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
        };
        (clean(&self.username), clean(&self.email))
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn require_identifier(req: &LoginRequest) -> Result<(), ValidationError> {
    match req.identifiers() {
        (None, None) => {
            let mut error = ValidationError::new("identifier_required");
            error.message = Some(Cow::Borrowed("username or email is required"));
            Err(error)
        }
        _ => Ok(()),
    }
}

/// Returned by login. Tokens are also set as cookies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Optional body for the refresh endpoint, for clients without cookies.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: Option<&str>, email: Option<&str>, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_username_only_is_valid() {
        assert!(request(Some("ana"), None, "pw").validate().is_ok());
    }

    #[test]
    fn test_email_only_is_valid() {
        assert!(request(None, Some("ana@example.com"), "pw").validate().is_ok());
    }

    #[test]
    fn test_identifier_required() {
        assert!(request(None, None, "pw").validate().is_err());
        assert!(request(Some("  "), Some(""), "pw").validate().is_err());
    }

    #[test]
    fn test_blank_password_rejected() {
        assert!(request(Some("ana"), None, "   ").validate().is_err());
    }

    #[test]
    fn test_identifiers_are_normalized() {
        let req = request(Some(" Ana "), Some("ANA@Example.com"), "pw");
        assert_eq!(
            req.identifiers(),
            (Some("ana".to_string()), Some("ana@example.com".to_string()))
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let req = request(Some("ana"), None, "hunter22");
        assert!(!format!("{req:?}").contains("hunter22"));
    }

    #[test]
    fn test_refresh_body_token_optional() {
        let empty: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.refresh_token.is_none());
    }
}
