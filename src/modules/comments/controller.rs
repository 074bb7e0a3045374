use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody, PageParams};
use vidtube_models::{Comment, CommentDto, CommentId, PaginatedComments, VideoId};

use super::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List comments on a video
#[utoipa::path(
    get,
    path = "/api/v1/comments/video/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id"), PageParams),
    responses(
        (status = 200, description = "Comments, newest first", body = PaginatedComments),
        (status = 400, description = "Invalid page", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn get_video_comments(
    State(state): State<AppState>,
    Path(video_id): Path<VideoId>,
    Query(params): Query<PageParams>,
) -> Result<Json<PaginatedComments>, AppError> {
    let comments = CommentService::list_for_video(&state.db, video_id, params).await?;
    Ok(Json(comments))
}

/// Comment on a video
#[utoipa::path(
    post,
    path = "/api/v1/comments/video/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id")),
    request_body = CommentDto,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn add_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(video_id): Path<VideoId>,
    ValidatedJson(dto): ValidatedJson<CommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = CommentService::add(&state.db, video_id, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = CommentId, Path, description = "Comment id")),
    request_body = CommentDto,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn update_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(comment_id): Path<CommentId>,
    ValidatedJson(dto): ValidatedJson<CommentDto>,
) -> Result<Json<Comment>, AppError> {
    let comment = CommentService::update(&state.db, comment_id, auth_user.id(), dto).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = CommentId, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(comment_id): Path<CommentId>,
) -> Result<StatusCode, AppError> {
    CommentService::delete(&state.db, comment_id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
