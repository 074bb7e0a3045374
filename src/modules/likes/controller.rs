use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{CommentId, LikeTarget, ToggleLikeResponse, TweetId, Video, VideoId};

use super::service::LikeService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

async fn toggle(
    state: &AppState,
    auth_user: &AuthUser,
    target: LikeTarget,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    let liked = LikeService::toggle(&state.db, auth_user.id(), target).await?;
    Ok(Json(ToggleLikeResponse { liked }))
}

/// Like or unlike a video
#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/video/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id")),
    responses(
        (status = 200, description = "Like toggled", body = ToggleLikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Likes"
)]
#[instrument(skip(state))]
pub async fn toggle_video_like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(video_id): Path<VideoId>,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    toggle(&state, &auth_user, LikeTarget::Video(video_id)).await
}

/// Like or unlike a comment
#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/comment/{comment_id}",
    params(("comment_id" = CommentId, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Like toggled", body = ToggleLikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Likes"
)]
#[instrument(skip(state))]
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(comment_id): Path<CommentId>,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    toggle(&state, &auth_user, LikeTarget::Comment(comment_id)).await
}

/// Like or unlike a tweet
#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/tweet/{tweet_id}",
    params(("tweet_id" = TweetId, Path, description = "Tweet id")),
    responses(
        (status = 200, description = "Like toggled", body = ToggleLikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Likes"
)]
#[instrument(skip(state))]
pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(tweet_id): Path<TweetId>,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    toggle(&state, &auth_user, LikeTarget::Tweet(tweet_id)).await
}

#[utoipa::path(
    get,
    path = "/api/v1/likes/videos",
    responses(
        (status = 200, description = "Videos liked by the caller", body = Vec<Video>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Likes"
)]
#[instrument(skip(state))]
pub async fn get_liked_videos(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Video>>, AppError> {
    let videos = LikeService::liked_videos(&state.db, auth_user.id()).await?;
    Ok(Json(videos))
}
