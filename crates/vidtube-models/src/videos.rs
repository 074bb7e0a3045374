//! Video records and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{UserId, VideoId};
use crate::ownership::Owned;

pub const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, video_public_id, \
     thumbnail_url, thumbnail_public_id, duration, views, is_published, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Video {
    pub id: VideoId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    #[serde(skip_serializing)]
    pub video_public_id: String,
    pub thumbnail_url: String,
    #[serde(skip_serializing)]
    pub thumbnail_public_id: String,
    /// Length in seconds
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Video {
    const KIND: &'static str = "video";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Text fields of the multipart upload form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVideoDto {
    #[validate(
        custom(function = "vidtube_core::validation::not_blank"),
        length(max = 200)
    )]
    pub title: String,
    #[validate(custom(function = "vidtube_core::validation::not_blank"))]
    pub description: String,
    #[validate(
        custom(function = "vidtube_core::validation::finite"),
        range(min = 0.0)
    )]
    pub duration: Option<f64>,
}

/// Multipart body accepted by the upload endpoint (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateVideoForm {
    pub title: String,
    pub description: String,
    pub duration: Option<f64>,
    #[schema(value_type = String, format = Binary)]
    pub video_file: Vec<u8>,
    #[schema(value_type = String, format = Binary)]
    pub thumbnail: Vec<u8>,
}

/// Blank or missing fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateVideoDto {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
}
