use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Aggregate numbers for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_subscribers: i64,
}
