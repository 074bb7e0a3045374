use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{SubscriptionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subscriber_id: UserId,
    pub channel_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A user as listed among subscribers or subscribed channels.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ChannelSummary {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleSubscriptionResponse {
    /// Whether the caller is subscribed after the toggle
    pub subscribed: bool,
}
