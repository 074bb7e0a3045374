use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;
use vidtube_core::media::delete_best_effort;
use vidtube_core::validation::non_blank;
use vidtube_core::{AppError, MediaKind, MediaStore, hash_password_blocking};
use vidtube_models::users::USER_COLUMNS;
use vidtube_models::{
    ChannelProfile, RegisterUserDto, UpdateAccountDto, User, UserId, WatchHistoryEntry,
};

use crate::metrics::track_user_registered;
use crate::utils::upload::{StagedFile, store_staged};

pub struct UserService;

impl UserService {
    /// Creates an account. The avatar is required; the cover image is optional.
    /// Media already uploaded is removed again if a later step fails.
    #[instrument(skip(db, media, avatar, cover_image), fields(username = %dto.username))]
    pub async fn register(
        db: &PgPool,
        media: &dyn MediaStore,
        dto: RegisterUserDto,
        avatar: StagedFile,
        cover_image: Option<StagedFile>,
    ) -> Result<User, AppError> {
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
            return Err(AppError::conflict(anyhow!(
                "User with email or username already exists"
            )));
        }

        let password_hash = hash_password_blocking(dto.password).await?;

        let avatar = store_staged(media, avatar, MediaKind::Image).await?;

        let cover = match cover_image {
            Some(staged) => match store_staged(media, staged, MediaKind::Image).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    delete_best_effort(media, &avatar.public_id, MediaKind::Image).await;
                    return Err(e);
                }
            },
            None => None,
        };

        let sql = format!(
            "INSERT INTO users (username, email, fullname, password_hash, avatar, avatar_public_id,
                                cover_image, cover_image_public_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.username)
            .bind(&dto.email)
            .bind(&dto.fullname)
            .bind(&password_hash)
            .bind(&avatar.url)
            .bind(&avatar.public_id)
            .bind(cover.as_ref().map(|c| c.url.as_str()))
            .bind(cover.as_ref().map(|c| c.public_id.as_str()))
            .fetch_one(db)
            .await;

        match inserted {
            Ok(user) => {
                track_user_registered();
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            Err(e) => {
                delete_best_effort(media, &avatar.public_id, MediaKind::Image).await;
                if let Some(cover) = &cover {
                    delete_best_effort(media, &cover.public_id, MediaKind::Image).await;
                }
                Err(e.into())
            }
        }
    }

    /// Updates the given fields; blank values keep the current value.
    #[instrument(skip(db))]
    pub async fn update_account(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateAccountDto,
    ) -> Result<User, AppError> {
        let fullname = non_blank(dto.fullname);
        let email = non_blank(dto.email).map(|e| e.to_lowercase());

        if fullname.is_none() && email.is_none() {
            return Err(AppError::validation(anyhow!(
                "fullname or email is required"
            )));
        }

        let sql = format!(
            "UPDATE users
             SET fullname = COALESCE($2, fullname),
                 email = COALESCE($3, email),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(fullname)
            .bind(email)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        Ok(user)
    }

    /// Replaces the avatar and deletes the previous one.
    #[instrument(skip(db, media, user, staged), fields(user_id = %user.id))]
    pub async fn update_avatar(
        db: &PgPool,
        media: &dyn MediaStore,
        user: &User,
        staged: StagedFile,
    ) -> Result<User, AppError> {
        let stored = store_staged(media, staged, MediaKind::Image).await?;

        let sql = format!(
            "UPDATE users SET avatar = $2, avatar_public_id = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&stored.url)
            .bind(&stored.public_id)
            .fetch_one(db)
            .await;

        match updated {
            Ok(updated) => {
                delete_best_effort(media, &user.avatar_public_id, MediaKind::Image).await;
                Ok(updated)
            }
            Err(e) => {
                delete_best_effort(media, &stored.public_id, MediaKind::Image).await;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(db, media, user, staged), fields(user_id = %user.id))]
    pub async fn update_cover_image(
        db: &PgPool,
        media: &dyn MediaStore,
        user: &User,
        staged: StagedFile,
    ) -> Result<User, AppError> {
        let stored = store_staged(media, staged, MediaKind::Image).await?;

        let sql = format!(
            "UPDATE users SET cover_image = $2, cover_image_public_id = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&stored.url)
            .bind(&stored.public_id)
            .fetch_one(db)
            .await;

        match updated {
            Ok(updated) => {
                if let Some(old) = &user.cover_image_public_id {
                    delete_best_effort(media, old, MediaKind::Image).await;
                }
                Ok(updated)
            }
            Err(e) => {
                delete_best_effort(media, &stored.public_id, MediaKind::Image).await;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn channel_profile(db: &PgPool, username: &str) -> Result<ChannelProfile, AppError> {
        let profile = sqlx::query_as::<_, ChannelProfile>(
            r#"SELECT
                u.id,
                u.username,
                u.fullname,
                u.avatar,
                u.cover_image,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) AS channels_subscribed_to_count
               FROM users u
               WHERE u.username = $1"#,
        )
        .bind(username.trim().to_lowercase())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Channel does not exist")))?;

        Ok(profile)
    }

    /// Most recently watched first.
    #[instrument(skip(db))]
    pub async fn watch_history(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<WatchHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, WatchHistoryEntry>(
            r#"SELECT
                v.id AS video_id,
                v.title,
                v.thumbnail_url,
                v.owner_id,
                o.username AS owner_username,
                w.watched_at
               FROM watch_history w
               JOIN videos v ON v.id = w.video_id
               JOIN users o ON o.id = v.owner_id
               WHERE w.user_id = $1
               ORDER BY w.watched_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};
    use vidtube_core::{ErrorKind, LocalMediaStore};

    fn staged(dir: &TempDir, name: &str) -> StagedFile {
        let path = dir.path().join(name);
        std::fs::write(&path, b"image-bytes").unwrap();
        StagedFile {
            path,
            original_name: Some(name.to_string()),
            size: 11,
        }
    }

    fn dto(username: &str, email: &str) -> RegisterUserDto {
        RegisterUserDto {
            username: username.to_string(),
            email: email.to_string(),
            fullname: "Test User".to_string(),
            password: "password123".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_creates_user_with_avatar(pool: PgPool) {
        let temp = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let media = LocalMediaStore::new(media_dir.path(), "http://media.test");

        let user = UserService::register(
            &pool,
            &media,
            dto(" Alice ", "Alice@Example.com"),
            staged(&temp, "a.png"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.avatar.starts_with("http://media.test/image/"));
        assert!(user.cover_image.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_is_conflict(pool: PgPool) {
        let temp = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let media = LocalMediaStore::new(media_dir.path(), "http://media.test");

        UserService::register(
            &pool,
            &media,
            dto("bob", "bob@example.com"),
            staged(&temp, "a.png"),
            None,
        )
        .await
        .unwrap();

        let err = UserService::register(
            &pool,
            &media,
            dto("bob", "other@example.com"),
            staged(&temp, "b.png"),
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_account_ignores_blank_fields(pool: PgPool) {
        let temp = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let media = LocalMediaStore::new(media_dir.path(), "http://media.test");
        let user = UserService::register(
            &pool,
            &media,
            dto("carol", "carol@example.com"),
            staged(&temp, "a.png"),
            None,
        )
        .await
        .unwrap();

        let updated = UserService::update_account(
            &pool,
            user.id,
            UpdateAccountDto {
                fullname: Some("Carol C".to_string()),
                email: Some("   ".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.fullname, "Carol C");
        assert_eq!(updated.email, "carol@example.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_channel_profile_counts(pool: PgPool) {
        let temp = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let media = LocalMediaStore::new(media_dir.path(), "http://media.test");
        let dave = UserService::register(
            &pool,
            &media,
            dto("dave", "dave@example.com"),
            staged(&temp, "a.png"),
            None,
        )
        .await
        .unwrap();
        let erin = UserService::register(
            &pool,
            &media,
            dto("erin", "erin@example.com"),
            staged(&temp, "b.png"),
            None,
        )
        .await
        .unwrap();

        sqlx::query("INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2)")
            .bind(erin.id)
            .bind(dave.id)
            .execute(&pool)
            .await
            .unwrap();

        let profile = UserService::channel_profile(&pool, "dave").await.unwrap();
        assert_eq!(profile.subscribers_count, 1);
        assert_eq!(profile.channels_subscribed_to_count, 0);

        let err = UserService::channel_profile(&pool, "nobody").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
