use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;
use vidtube_core::media::delete_best_effort;
use vidtube_core::validation::non_blank;
use vidtube_core::{AppError, MediaKind, MediaStore};
use vidtube_models::videos::VIDEO_COLUMNS;
use vidtube_models::{CreateVideoDto, UpdateVideoDto, UserId, Video, VideoId, authorize_owner};

use crate::utils::upload::{StagedFile, store_staged};

pub struct VideoService;

impl VideoService {
    async fn find(db: &PgPool, video_id: VideoId) -> Result<Option<Video>, AppError> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .fetch_optional(db)
            .await?;
        Ok(video)
    }

    /// Loads a video the caller owns: `NotFound`, then `Forbidden`.
    pub async fn find_owned(
        db: &PgPool,
        video_id: VideoId,
        caller: UserId,
    ) -> Result<Video, AppError> {
        authorize_owner(Self::find(db, video_id).await?, caller)
    }

    /// Uploads both files and creates the video. If the thumbnail upload
    /// fails the already-uploaded video file is deleted again.
    #[instrument(skip(db, media, video_file, thumbnail))]
    pub async fn publish(
        db: &PgPool,
        media: &dyn MediaStore,
        owner_id: UserId,
        dto: CreateVideoDto,
        video_file: StagedFile,
        thumbnail: StagedFile,
    ) -> Result<Video, AppError> {
        dto.validate()?;

        let video_media = store_staged(media, video_file, MediaKind::Video).await?;

        let thumbnail_media = match store_staged(media, thumbnail, MediaKind::Image).await {
            Ok(stored) => stored,
            Err(e) => {
                delete_best_effort(media, &video_media.public_id, MediaKind::Video).await;
                return Err(e);
            }
        };

        let duration = video_media
            .duration
            .filter(|d| d.is_finite())
            .or(dto.duration)
            .unwrap_or(0.0);

        let sql = format!(
            "INSERT INTO videos (owner_id, title, description, video_url, video_public_id,
                                 thumbnail_url, thumbnail_public_id, duration)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {VIDEO_COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, Video>(&sql)
            .bind(owner_id)
            .bind(dto.title.trim())
            .bind(dto.description.trim())
            .bind(&video_media.url)
            .bind(&video_media.public_id)
            .bind(&thumbnail_media.url)
            .bind(&thumbnail_media.public_id)
            .bind(duration)
            .fetch_one(db)
            .await;

        match inserted {
            Ok(video) => {
                tracing::info!(video_id = %video.id, "Video published");
                Ok(video)
            }
            Err(e) => {
                delete_best_effort(media, &video_media.public_id, MediaKind::Video).await;
                delete_best_effort(media, &thumbnail_media.public_id, MediaKind::Image).await;
                Err(e.into())
            }
        }
    }

    /// Fetches a video for viewing.
    ///
    /// Unpublished videos are only visible to their owner. Each successful
    /// fetch counts a view and, with a session, lands in the viewer's watch
    /// history.
    #[instrument(skip(db))]
    pub async fn watch(
        db: &PgPool,
        video_id: VideoId,
        viewer: Option<UserId>,
    ) -> Result<Video, AppError> {
        let not_found = || AppError::not_found(anyhow!("Video not found"));

        let video = Self::find(db, video_id).await?.ok_or_else(not_found)?;
        if !video.is_published && viewer != Some(video.owner_id) {
            return Err(not_found());
        }

        let sql = format!(
            "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(not_found)?;

        if let Some(viewer) = viewer {
            sqlx::query(
                "INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2)
                 ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()",
            )
            .bind(viewer)
            .bind(video_id)
            .execute(db)
            .await?;
        }

        Ok(video)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        video_id: VideoId,
        caller: UserId,
        dto: UpdateVideoDto,
    ) -> Result<Video, AppError> {
        Self::find_owned(db, video_id, caller).await?;

        let sql = format!(
            "UPDATE videos
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {VIDEO_COLUMNS}"
        );

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .bind(non_blank(dto.title))
            .bind(non_blank(dto.description))
            .fetch_one(db)
            .await?;

        Ok(video)
    }

    /// Deletes the row first, then both media assets best-effort.
    #[instrument(skip(db, media))]
    pub async fn delete(
        db: &PgPool,
        media: &dyn MediaStore,
        video_id: VideoId,
        caller: UserId,
    ) -> Result<(), AppError> {
        let video = Self::find_owned(db, video_id, caller).await?;

        sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(db)
            .await?;

        delete_best_effort(media, &video.thumbnail_public_id, MediaKind::Image).await;
        delete_best_effort(media, &video.video_public_id, MediaKind::Video).await;

        tracing::info!(video_id = %video_id, "Video deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn toggle_publish(
        db: &PgPool,
        video_id: VideoId,
        caller: UserId,
    ) -> Result<Video, AppError> {
        Self::find_owned(db, video_id, caller).await?;

        let sql = format!(
            "UPDATE videos SET is_published = NOT is_published, updated_at = NOW()
             WHERE id = $1
             RETURNING {VIDEO_COLUMNS}"
        );

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .fetch_one(db)
            .await?;

        Ok(video)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use vidtube_core::ErrorKind;

    pub(crate) async fn create_test_user(pool: &PgPool, username: &str) -> UserId {
        sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (username, email, fullname, avatar, avatar_public_id, password_hash)
             VALUES ($1, $2, $1, 'http://media.test/a.png', 'image/a.png', 'not-a-hash')
             RETURNING id",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub(crate) async fn create_test_video(pool: &PgPool, owner: UserId, published: bool) -> VideoId {
        sqlx::query_scalar::<_, VideoId>(
            "INSERT INTO videos (owner_id, title, description, video_url, video_public_id,
                                 thumbnail_url, thumbnail_public_id, duration, is_published)
             VALUES ($1, 'Test video', 'desc', 'http://media.test/v.mp4', 'video/v.mp4',
                     'http://media.test/t.png', 'image/t.png', 10.0, $2)
             RETURNING id",
        )
        .bind(owner)
        .bind(published)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_watch_counts_view_and_records_history(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let viewer = create_test_user(&pool, "viewer").await;
        let video_id = create_test_video(&pool, owner, true).await;

        let video = VideoService::watch(&pool, video_id, Some(viewer)).await.unwrap();
        assert_eq!(video.views, 1);

        let video = VideoService::watch(&pool, video_id, None).await.unwrap();
        assert_eq!(video.views, 2);

        let history: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM watch_history WHERE user_id = $1")
                .bind(viewer)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(history, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unpublished_video_hidden_from_others(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let other = create_test_user(&pool, "other").await;
        let video_id = create_test_video(&pool, owner, false).await;

        let err = VideoService::watch(&pool, video_id, Some(other)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = VideoService::watch(&pool, video_id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert!(VideoService::watch(&pool, video_id, Some(owner)).await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_non_owner_cannot_update(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let other = create_test_user(&pool, "other").await;
        let video_id = create_test_video(&pool, owner, true).await;

        let dto = UpdateVideoDto {
            title: Some("Hijacked".to_string()),
            description: None,
        };
        let err = VideoService::update(&pool, video_id, other, dto).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let title: String = sqlx::query_scalar("SELECT title FROM videos WHERE id = $1")
            .bind(video_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(title, "Test video");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_toggle_publish_flips_flag(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let video_id = create_test_video(&pool, owner, true).await;

        let video = VideoService::toggle_publish(&pool, video_id, owner).await.unwrap();
        assert!(!video.is_published);
        let video = VideoService::toggle_publish(&pool, video_id, owner).await.unwrap();
        assert!(video.is_published);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_removes_row(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let video_id = create_test_video(&pool, owner, true).await;
        let media_dir = tempfile::tempdir().unwrap();
        let media = vidtube_core::LocalMediaStore::new(media_dir.path(), "http://media.test");

        VideoService::delete(&pool, &media, video_id, owner).await.unwrap();

        let err = VideoService::find_owned(&pool, video_id, owner).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
