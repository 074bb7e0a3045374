//! Likes on videos, comments and tweets.
//!
//! A like row references exactly one target; [`LikeTarget`] keeps the
//! target table and the like column in one place.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ids::{CommentId, LikeId, TweetId, UserId, VideoId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Like {
    pub id: LikeId,
    pub liked_by: UserId,
    pub video_id: Option<VideoId>,
    pub comment_id: Option<CommentId>,
    pub tweet_id: Option<TweetId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(VideoId),
    Comment(CommentId),
    Tweet(TweetId),
}

impl LikeTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Video(_) => "video",
            Self::Comment(_) => "comment",
            Self::Tweet(_) => "tweet",
        }
    }

    /// Table holding the liked entity.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Video(_) => "videos",
            Self::Comment(_) => "comments",
            Self::Tweet(_) => "tweets",
        }
    }

    /// Column of `likes` referencing the entity.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Video(_) => "video_id",
            Self::Comment(_) => "comment_id",
            Self::Tweet(_) => "tweet_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Video(id) => id.into_inner(),
            Self::Comment(id) => id.into_inner(),
            Self::Tweet(id) => id.into_inner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleLikeResponse {
    /// Whether the caller likes the target after the toggle
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns() {
        let id = VideoId::new();
        let target = LikeTarget::Video(id);
        assert_eq!(target.table(), "videos");
        assert_eq!(target.column(), "video_id");
        assert_eq!(target.id(), id.into_inner());

        assert_eq!(LikeTarget::Tweet(TweetId::new()).column(), "tweet_id");
        assert_eq!(LikeTarget::Comment(CommentId::new()).table(), "comments");
    }
}
