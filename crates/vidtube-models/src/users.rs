//! User records and account DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{UserId, VideoId};

/// Columns of the public user projection. Never includes the password hash
/// or the stored refresh token.
pub const USER_COLUMNS: &str = "id, username, email, fullname, avatar, avatar_public_id, \
     cover_image, cover_image_public_id, created_at, updated_at";

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    #[schema(example = "chaiaurcode")]
    pub username: String,
    #[schema(example = "chai@example.com")]
    pub email: String,
    #[schema(example = "Chai Aur Code")]
    pub fullname: String,
    pub avatar: String,
    #[serde(skip_serializing)]
    pub avatar_public_id: String,
    pub cover_image: Option<String>,
    #[serde(skip_serializing)]
    pub cover_image_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the credential store needs to authenticate a user.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Text fields of the multipart registration form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 3, max = 30),
        custom(function = "vidtube_core::validation::username_chars")
    )]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "vidtube_core::validation::not_blank"))]
    pub fullname: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

impl RegisterUserDto {
    /// Lowercases and trims the identifiers the way they are stored.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_lowercase(),
            email: self.email.trim().to_lowercase(),
            fullname: self.fullname.trim().to_string(),
            password: self.password,
        }
    }
}

/// Multipart body accepted by the registration endpoint (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RegisterUserForm {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    #[schema(value_type = String, format = Binary)]
    pub avatar: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover_image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountDto {
    pub fullname: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangePasswordDto { .. }")
    }
}

/// Public channel page for a user.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ChannelProfile {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
}

/// One entry of a user's watch history.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct WatchHistoryEntry {
    pub video_id: VideoId,
    pub title: String,
    pub thumbnail_url: String,
    pub owner_id: UserId,
    pub owner_username: String,
    pub watched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> RegisterUserDto {
        RegisterUserDto {
            username: "chaiaurcode".to_string(),
            email: "chai@example.com".to_string(),
            fullname: "Chai Aur Code".to_string(),
            password: "supersecret".to_string(),
        }
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_register_dto_rejects_short_password() {
        let mut d = dto();
        d.password = "short".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_blank_fullname() {
        let mut d = dto();
        d.fullname = "   ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_normalized_lowercases_identifiers() {
        let mut d = dto();
        d.username = "  ChaiAurCode ".to_string();
        d.email = "Chai@Example.COM".to_string();
        let n = d.normalized();
        assert_eq!(n.username, "chaiaurcode");
        assert_eq!(n.email, "chai@example.com");
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_user_serialization_hides_media_ids() {
        let user = User {
            id: UserId::new(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            fullname: "Ana".to_string(),
            avatar: "https://cdn.test/a.png".to_string(),
            avatar_public_id: "image/a".to_string(),
            cover_image: None,
            cover_image_public_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("avatar_public_id").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["username"], "ana");
    }
}
