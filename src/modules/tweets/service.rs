use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::AppError;
use vidtube_models::{Tweet, TweetDto, TweetId, UserId, authorize_owner};

const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

pub struct TweetService;

impl TweetService {
    async fn find(db: &PgPool, tweet_id: TweetId) -> Result<Option<Tweet>, AppError> {
        let sql = format!("SELECT {TWEET_COLUMNS} FROM tweets WHERE id = $1");
        let tweet = sqlx::query_as::<_, Tweet>(&sql)
            .bind(tweet_id)
            .fetch_optional(db)
            .await?;
        Ok(tweet)
    }

    #[instrument(skip(db))]
    pub async fn create(db: &PgPool, owner_id: UserId, dto: TweetDto) -> Result<Tweet, AppError> {
        let sql = format!(
            "INSERT INTO tweets (owner_id, content) VALUES ($1, $2) RETURNING {TWEET_COLUMNS}"
        );
        let tweet = sqlx::query_as::<_, Tweet>(&sql)
            .bind(owner_id)
            .bind(dto.content.trim())
            .fetch_one(db)
            .await?;
        Ok(tweet)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, tweet_id: TweetId) -> Result<Tweet, AppError> {
        Self::find(db, tweet_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Tweet not found")))
    }

    /// Newest first. Unknown users are `NotFound`.
    #[instrument(skip(db))]
    pub async fn list_by_username(db: &PgPool, username: &str) -> Result<Vec<Tweet>, AppError> {
        let owner_id = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE username = $1")
            .bind(username.trim().to_lowercase())
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let tweets = sqlx::query_as::<_, Tweet>(&sql)
            .bind(owner_id)
            .fetch_all(db)
            .await?;
        Ok(tweets)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        tweet_id: TweetId,
        caller: UserId,
        dto: TweetDto,
    ) -> Result<Tweet, AppError> {
        authorize_owner(Self::find(db, tweet_id).await?, caller)?;

        let sql = format!(
            "UPDATE tweets SET content = $2, updated_at = NOW() WHERE id = $1
             RETURNING {TWEET_COLUMNS}"
        );
        let tweet = sqlx::query_as::<_, Tweet>(&sql)
            .bind(tweet_id)
            .bind(dto.content.trim())
            .fetch_one(db)
            .await?;
        Ok(tweet)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, tweet_id: TweetId, caller: UserId) -> Result<(), AppError> {
        authorize_owner(Self::find(db, tweet_id).await?, caller)?;

        sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(tweet_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::videos::service::tests::create_test_user;
    use vidtube_core::ErrorKind;

    fn dto(content: &str) -> TweetDto {
        TweetDto {
            content: content.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_list_by_username(pool: PgPool) {
        let owner = create_test_user(&pool, "tweeter").await;

        TweetService::create(&pool, owner, dto("first")).await.unwrap();
        TweetService::create(&pool, owner, dto("  second  ")).await.unwrap();

        let tweets = TweetService::list_by_username(&pool, "Tweeter").await.unwrap();
        assert_eq!(tweets.len(), 2);
        assert!(tweets.iter().any(|t| t.content == "second"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_unknown_user_is_not_found(pool: PgPool) {
        let err = TweetService::list_by_username(&pool, "ghost").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_non_owner_cannot_delete(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let other = create_test_user(&pool, "other").await;
        let tweet = TweetService::create(&pool, owner, dto("mine")).await.unwrap();

        let err = TweetService::delete(&pool, tweet.id, other).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(TweetService::get(&pool, tweet.id).await.is_ok());

        TweetService::delete(&pool, tweet.id, owner).await.unwrap();
        let err = TweetService::get(&pool, tweet.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_owner_can_update(pool: PgPool) {
        let owner = create_test_user(&pool, "owner").await;
        let tweet = TweetService::create(&pool, owner, dto("draft")).await.unwrap();

        let updated = TweetService::update(&pool, tweet.id, owner, dto("final"))
            .await
            .unwrap();
        assert_eq!(updated.content, "final");
    }
}
