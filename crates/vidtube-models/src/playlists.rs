use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PlaylistId, UserId};
use crate::ownership::Owned;
use crate::videos::Video;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Playlist {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaylistWithVideos {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePlaylistDto {
    #[validate(
        custom(function = "vidtube_core::validation::not_blank"),
        length(max = 100)
    )]
    #[schema(example = "Favorites")]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

/// Blank or missing fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePlaylistDto {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
