use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::AppError;
use vidtube_models::{ChannelSummary, UserId};

pub struct SubscriptionService;

impl SubscriptionService {
    async fn ensure_user_exists(db: &PgPool, user_id: UserId, label: &str) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(db)
            .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("{label} not found")));
        }
        Ok(())
    }

    /// Returns whether the subscriber follows the channel afterwards.
    #[instrument(skip(db))]
    pub async fn toggle(
        db: &PgPool,
        subscriber_id: UserId,
        channel_id: UserId,
    ) -> Result<bool, AppError> {
        if subscriber_id == channel_id {
            return Err(AppError::bad_request(anyhow!(
                "You cannot subscribe to your own channel"
            )));
        }

        Self::ensure_user_exists(db, channel_id, "Channel").await?;

        let removed = sqlx::query(
            "DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(db)
        .await?
        .rows_affected();

        if removed > 0 {
            tracing::info!(%channel_id, "Unsubscribed");
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT subscriptions_pair_unique DO NOTHING",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(db)
        .await?;

        tracing::info!(%channel_id, "Subscribed");
        Ok(true)
    }

    #[instrument(skip(db))]
    pub async fn subscribers(db: &PgPool, channel_id: UserId) -> Result<Vec<ChannelSummary>, AppError> {
        Self::ensure_user_exists(db, channel_id, "Channel").await?;

        let subscribers = sqlx::query_as::<_, ChannelSummary>(
            "SELECT u.id, u.username, u.fullname, u.avatar, s.created_at AS subscribed_at
             FROM subscriptions s
             JOIN users u ON u.id = s.subscriber_id
             WHERE s.channel_id = $1
             ORDER BY s.created_at DESC",
        )
        .bind(channel_id)
        .fetch_all(db)
        .await?;
        Ok(subscribers)
    }

    /// Channels the given user is subscribed to.
    #[instrument(skip(db))]
    pub async fn subscribed_channels(
        db: &PgPool,
        subscriber_id: UserId,
    ) -> Result<Vec<ChannelSummary>, AppError> {
        Self::ensure_user_exists(db, subscriber_id, "User").await?;

        let channels = sqlx::query_as::<_, ChannelSummary>(
            "SELECT u.id, u.username, u.fullname, u.avatar, s.created_at AS subscribed_at
             FROM subscriptions s
             JOIN users u ON u.id = s.channel_id
             WHERE s.subscriber_id = $1
             ORDER BY s.created_at DESC",
        )
        .bind(subscriber_id)
        .fetch_all(db)
        .await?;
        Ok(channels)
    }
}
