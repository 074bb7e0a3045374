use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::AppError;
use vidtube_models::videos::VIDEO_COLUMNS;
use vidtube_models::{LikeTarget, UserId, Video};

pub struct LikeService;

impl LikeService {
    /// Deletes the caller's like on `target` if there is one, otherwise
    /// creates it. Returns whether the target is liked afterwards.
    #[instrument(skip(db))]
    pub async fn toggle(db: &PgPool, user_id: UserId, target: LikeTarget) -> Result<bool, AppError> {
        let exists_sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", target.table());
        let exists = sqlx::query_scalar::<_, bool>(&exists_sql)
            .bind(target.id())
            .fetch_one(db)
            .await?;

        if !exists {
            let label = match target {
                LikeTarget::Video(_) => "Video",
                LikeTarget::Comment(_) => "Comment",
                LikeTarget::Tweet(_) => "Tweet",
            };
            return Err(AppError::not_found(anyhow!("{label} not found")));
        }

        let delete_sql = format!(
            "DELETE FROM likes WHERE liked_by = $1 AND {} = $2",
            target.column()
        );
        let removed = sqlx::query(&delete_sql)
            .bind(user_id)
            .bind(target.id())
            .execute(db)
            .await?
            .rows_affected();

        if removed > 0 {
            tracing::debug!(kind = target.kind(), "Like removed");
            return Ok(false);
        }

        // A concurrent toggle may have inserted the same like; the partial
        // unique index turns that into a no-op.
        let insert_sql = format!(
            "INSERT INTO likes (liked_by, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            target.column()
        );
        sqlx::query(&insert_sql)
            .bind(user_id)
            .bind(target.id())
            .execute(db)
            .await?;

        tracing::debug!(kind = target.kind(), "Like added");
        Ok(true)
    }

    /// Published videos the user has liked, most recently liked first.
    #[instrument(skip(db))]
    pub async fn liked_videos(db: &PgPool, user_id: UserId) -> Result<Vec<Video>, AppError> {
        let columns = VIDEO_COLUMNS
            .split(", ")
            .map(|c| format!("v.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {columns} FROM likes l
             JOIN videos v ON v.id = l.video_id
             WHERE l.liked_by = $1 AND v.is_published
             ORDER BY l.created_at DESC"
        );

        let videos = sqlx::query_as::<_, Video>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await?;
        Ok(videos)
    }
}
