use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{TweetId, UserId};
use crate::ownership::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Tweet {
    pub id: TweetId,
    pub owner_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Tweet {
    const KIND: &'static str = "tweet";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TweetDto {
    #[validate(
        custom(function = "vidtube_core::validation::not_blank"),
        length(max = 280)
    )]
    #[schema(example = "Shipping a new video tonight")]
    pub content: String,
}
