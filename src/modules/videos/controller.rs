use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::videos::CreateVideoForm;
use vidtube_models::{CreateVideoDto, UpdateVideoDto, Video, VideoId};

use super::service::VideoService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::upload::MultipartForm;
use crate::validator::ValidatedJson;

fn parse_duration(raw: Option<&str>) -> Result<Option<f64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::bad_request(anyhow!("duration must be a number of seconds"))),
    }
}

/// Upload and publish a video
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    request_body(content = CreateVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video published", body = Video),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Validation error or missing file", body = ErrorBody),
        (status = 502, description = "Media upload failed", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Videos"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn publish_video(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Video>), AppError> {
    let mut form = MultipartForm::read(multipart, &state.config.media.upload_dir).await?;

    let dto = CreateVideoDto {
        title: form.text_or_default("title"),
        description: form.text_or_default("description"),
        duration: parse_duration(form.text("duration"))?,
    };
    let video_file = form.require_file("videoFile")?;
    let thumbnail = form.require_file("thumbnail")?;

    let video = VideoService::publish(
        &state.db,
        state.media.as_ref(),
        auth_user.id(),
        dto,
        video_file,
        thumbnail,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// Watch a video
///
/// A session is optional. Unpublished videos are only returned to their owner.
#[utoipa::path(
    get,
    path = "/api/v1/videos/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video", body = Video),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    tag = "Videos"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_video(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(video_id): Path<VideoId>,
) -> Result<Json<Video>, AppError> {
    let viewer = auth_user.map(|u| u.id());
    let video = VideoService::watch(&state.db, video_id, viewer).await?;
    Ok(Json(video))
}

/// Update title and/or description
#[utoipa::path(
    patch,
    path = "/api/v1/videos/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id")),
    request_body = UpdateVideoDto,
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Videos"
)]
#[instrument(skip(state))]
pub async fn update_video(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(video_id): Path<VideoId>,
    ValidatedJson(dto): ValidatedJson<UpdateVideoDto>,
) -> Result<Json<Video>, AppError> {
    let video = VideoService::update(&state.db, video_id, auth_user.id(), dto).await?;
    Ok(Json(video))
}

/// Delete a video and its media
#[utoipa::path(
    delete,
    path = "/api/v1/videos/{video_id}",
    params(("video_id" = VideoId, Path, description = "Video id")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Videos"
)]
#[instrument(skip(state))]
pub async fn delete_video(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(video_id): Path<VideoId>,
) -> Result<StatusCode, AppError> {
    VideoService::delete(&state.db, state.media.as_ref(), video_id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish or unpublish a video
#[utoipa::path(
    patch,
    path = "/api/v1/videos/{video_id}/toggle-publish",
    params(("video_id" = VideoId, Path, description = "Video id")),
    responses(
        (status = 200, description = "Publish status flipped", body = Video),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Videos"
)]
#[instrument(skip(state))]
pub async fn toggle_publish_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(video_id): Path<VideoId>,
) -> Result<Json<Video>, AppError> {
    let video = VideoService::toggle_publish(&state.db, video_id, auth_user.id()).await?;
    Ok(Json(video))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidtube_core::ErrorKind;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(None).unwrap(), None);
        assert_eq!(parse_duration(Some("  ")).unwrap(), None);
        assert_eq!(parse_duration(Some("12.5")).unwrap(), Some(12.5));
        assert_eq!(
            parse_duration(Some("abc")).unwrap_err().kind,
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_parse_duration_rejects_non_finite() {
        for raw in ["NaN", "inf", "-inf", "infinity"] {
            assert_eq!(
                parse_duration(Some(raw)).unwrap_err().kind,
                ErrorKind::BadRequest,
                "{raw}"
            );
        }
    }
}
