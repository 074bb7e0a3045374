//! Account administration: creating users and revoking their sessions.

use sqlx::PgPool;
use validator::Validate;
use vidtube_core::hash_password;
use vidtube_models::{RegisterUserDto, UserId};

use crate::CliResult;

/// Placeholder avatar for accounts created outside the upload flow.
pub const DEFAULT_AVATAR_URL: &str = "https://res.cloudinary.com/demo/image/upload/avatar.png";

/// Validates and inserts a user. Username and email are stored lowercased.
pub async fn create_user(db: &PgPool, dto: RegisterUserDto) -> CliResult<UserId> {
    let dto = dto.normalized();
    dto.validate()?;

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(&dto.username)
    .bind(&dto.email)
    .fetch_one(db)
    .await?;

    if taken {
        return Err("A user with this username or email already exists".into());
    }

    let password_hash =
        hash_password(&dto.password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, fullname, avatar, avatar_public_id, password_hash)
         VALUES ($1, $2, $3, $4, '', $5)
         RETURNING id",
    )
    .bind(&dto.username)
    .bind(&dto.email)
    .bind(&dto.fullname)
    .bind(DEFAULT_AVATAR_URL)
    .bind(&password_hash)
    .fetch_one(db)
    .await?;

    Ok(id)
}

/// Clears the stored refresh token so every outstanding refresh token of the
/// user stops working. Returns `false` when no such user exists.
pub async fn revoke_sessions(db: &PgPool, username: &str) -> CliResult<bool> {
    let updated = sqlx::query("UPDATE users SET refresh_token = NULL WHERE username = $1")
        .bind(username.trim().to_lowercase())
        .execute(db)
        .await?
        .rows_affected();

    Ok(updated > 0)
}
