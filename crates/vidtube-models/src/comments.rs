use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;
use vidtube_core::PageMeta;

use crate::ids::{CommentId, UserId, VideoId};
use crate::ownership::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: CommentId,
    pub video_id: VideoId,
    pub owner_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Comment {
    const KIND: &'static str = "comment";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentDto {
    #[validate(
        custom(function = "vidtube_core::validation::not_blank"),
        length(max = 2000)
    )]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedComments {
    pub data: Vec<Comment>,
    pub meta: PageMeta,
}
