use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{ChannelStats, UserId, Video};

use super::service::DashboardService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/channel/{channel_id}/stats",
    params(("channel_id" = UserId, Path, description = "Channel owner id")),
    responses(
        (status = 200, description = "Channel totals", body = ChannelStats),
        (status = 404, description = "Channel not found", body = ErrorBody)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_channel_stats(
    State(state): State<AppState>,
    Path(channel_id): Path<UserId>,
) -> Result<Json<ChannelStats>, AppError> {
    let stats = DashboardService::channel_stats(&state.db, channel_id).await?;
    Ok(Json(stats))
}

/// List a channel's videos
///
/// Unpublished videos are included only when the owner asks.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/channel/{channel_id}/videos",
    params(("channel_id" = UserId, Path, description = "Channel owner id")),
    responses(
        (status = 200, description = "Channel videos, newest first", body = Vec<Video>),
        (status = 404, description = "Channel not found", body = ErrorBody)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_channel_videos(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(channel_id): Path<UserId>,
) -> Result<Json<Vec<Video>>, AppError> {
    let viewer = auth_user.map(|u| u.id());
    let videos = DashboardService::channel_videos(&state.db, channel_id, viewer).await?;
    Ok(Json(videos))
}
