use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::{AppError, PageParams};
use vidtube_models::{
    Comment, CommentDto, CommentId, PaginatedComments, UserId, VideoId, authorize_owner,
};

const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";

pub struct CommentService;

impl CommentService {
    async fn find(db: &PgPool, comment_id: CommentId) -> Result<Option<Comment>, AppError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .fetch_optional(db)
            .await?;
        Ok(comment)
    }

    async fn ensure_video_exists(db: &PgPool, video_id: VideoId) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
            .bind(video_id)
            .fetch_one(db)
            .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Video not found")));
        }
        Ok(())
    }

    /// Newest first, paginated.
    #[instrument(skip(db))]
    pub async fn list_for_video(
        db: &PgPool,
        video_id: VideoId,
        params: PageParams,
    ) -> Result<PaginatedComments, AppError> {
        let offset = params.offset()?;
        let limit = params.limit();

        Self::ensure_video_exists(db, video_id).await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE video_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let data = sqlx::query_as::<_, Comment>(&sql)
            .bind(video_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        Ok(PaginatedComments {
            data,
            meta: params.meta(total)?,
        })
    }

    #[instrument(skip(db))]
    pub async fn add(
        db: &PgPool,
        video_id: VideoId,
        owner_id: UserId,
        dto: CommentDto,
    ) -> Result<Comment, AppError> {
        Self::ensure_video_exists(db, video_id).await?;

        let sql = format!(
            "INSERT INTO comments (video_id, owner_id, content) VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(video_id)
            .bind(owner_id)
            .bind(dto.content.trim())
            .fetch_one(db)
            .await?;
        Ok(comment)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        comment_id: CommentId,
        caller: UserId,
        dto: CommentDto,
    ) -> Result<Comment, AppError> {
        authorize_owner(Self::find(db, comment_id).await?, caller)?;

        let sql = format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1
             RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .bind(dto.content.trim())
            .fetch_one(db)
            .await?;
        Ok(comment)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, comment_id: CommentId, caller: UserId) -> Result<(), AppError> {
        authorize_owner(Self::find(db, comment_id).await?, caller)?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::videos::service::tests::{create_test_user, create_test_video};
    use vidtube_core::ErrorKind;

    fn dto(content: &str) -> CommentDto {
        CommentDto {
            content: content.to_string(),
        }
    }

    fn page(page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams { page, limit }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pagination(pool: PgPool) {
        let user = create_test_user(&pool, "commenter").await;
        let video = create_test_video(&pool, user, true).await;
        for i in 0..5 {
            CommentService::add(&pool, video, user, dto(&format!("comment {i}")))
                .await
                .unwrap();
        }

        let first = CommentService::list_for_video(&pool, video, page(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(first.data.len(), 2);
        assert_eq!(first.meta.total, 5);
        assert_eq!(first.meta.total_pages, 3);
        assert!(first.meta.has_next_page);

        let last = CommentService::list_for_video(&pool, video, page(Some(3), Some(2)))
            .await
            .unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.meta.has_next_page);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_page_zero_rejected(pool: PgPool) {
        let user = create_test_user(&pool, "commenter").await;
        let video = create_test_video(&pool, user, true).await;

        let err = CommentService::list_for_video(&pool, video, page(Some(0), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_page_past_offset_range_rejected(pool: PgPool) {
        let params = page(Some(i64::MAX), Some(100));
        let err = CommentService::list_for_video(&pool, VideoId::new(), params)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_video(pool: PgPool) {
        let user = create_test_user(&pool, "commenter").await;

        let err = CommentService::list_for_video(&pool, VideoId::new(), PageParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = CommentService::add(&pool, VideoId::new(), user, dto("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_non_owner_cannot_edit(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let other = create_test_user(&pool, "other").await;
        let video = create_test_video(&pool, owner, true).await;
        let comment = CommentService::add(&pool, video, owner, dto("original"))
            .await
            .unwrap();

        let err = CommentService::update(&pool, comment.id, other, dto("edited"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = CommentService::delete(&pool, comment.id, other).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
}
