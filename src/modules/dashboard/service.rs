use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::AppError;
use vidtube_models::videos::VIDEO_COLUMNS;
use vidtube_models::{ChannelStats, UserId, Video};

pub struct DashboardService;

impl DashboardService {
    async fn ensure_channel_exists(db: &PgPool, channel_id: UserId) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(channel_id)
            .fetch_one(db)
            .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Channel not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn channel_stats(db: &PgPool, channel_id: UserId) -> Result<ChannelStats, AppError> {
        Self::ensure_channel_exists(db, channel_id).await?;

        let stats = sqlx::query_as::<_, ChannelStats>(
            r#"SELECT
                (SELECT COUNT(*) FROM videos WHERE owner_id = $1) AS total_videos,
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1) AS total_views,
                (SELECT COUNT(*) FROM likes l JOIN videos v ON v.id = l.video_id
                  WHERE v.owner_id = $1) AS total_likes,
                (SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1) AS total_subscribers"#,
        )
        .bind(channel_id)
        .fetch_one(db)
        .await?;
        Ok(stats)
    }

    /// The owner sees every upload; everyone else only published ones.
    #[instrument(skip(db))]
    pub async fn channel_videos(
        db: &PgPool,
        channel_id: UserId,
        viewer: Option<UserId>,
    ) -> Result<Vec<Video>, AppError> {
        Self::ensure_channel_exists(db, channel_id).await?;

        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos
             WHERE owner_id = $1 AND (is_published OR owner_id = $2)
             ORDER BY created_at DESC"
        );
        let videos = sqlx::query_as::<_, Video>(&sql)
            .bind(channel_id)
            .bind(viewer)
            .fetch_all(db)
            .await?;
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::likes::service::LikeService;
    use crate::modules::subscriptions::service::SubscriptionService;
    use crate::modules::videos::service::tests::{create_test_user, create_test_video};
    use vidtube_core::ErrorKind;
    use vidtube_models::LikeTarget;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_channel_stats(pool: PgPool) {
        let owner = create_test_user(&pool, "creator").await;
        let fan = create_test_user(&pool, "fan").await;
        let first = create_test_video(&pool, owner, true).await;
        create_test_video(&pool, owner, false).await;

        sqlx::query("UPDATE videos SET views = 7 WHERE id = $1")
            .bind(first)
            .execute(&pool)
            .await
            .unwrap();
        LikeService::toggle(&pool, fan, LikeTarget::Video(first)).await.unwrap();
        SubscriptionService::toggle(&pool, fan, owner).await.unwrap();

        let stats = DashboardService::channel_stats(&pool, owner).await.unwrap();
        assert_eq!(
            stats,
            ChannelStats {
                total_videos: 2,
                total_views: 7,
                total_likes: 1,
                total_subscribers: 1,
            }
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_channel_stats(pool: PgPool) {
        let owner = create_test_user(&pool, "quiet").await;

        let stats = DashboardService::channel_stats(&pool, owner).await.unwrap();
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.total_videos, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_channel_videos_visibility(pool: PgPool) {
        let owner = create_test_user(&pool, "creator").await;
        let other = create_test_user(&pool, "other").await;
        create_test_video(&pool, owner, true).await;
        create_test_video(&pool, owner, false).await;

        let own = DashboardService::channel_videos(&pool, owner, Some(owner)).await.unwrap();
        assert_eq!(own.len(), 2);

        let public = DashboardService::channel_videos(&pool, owner, Some(other)).await.unwrap();
        assert_eq!(public.len(), 1);

        let err = DashboardService::channel_videos(&pool, UserId::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
