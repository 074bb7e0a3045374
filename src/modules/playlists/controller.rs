use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{
    CreatePlaylistDto, Playlist, PlaylistId, PlaylistWithVideos, UpdatePlaylistDto, VideoId,
};

use super::service::PlaylistService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/v1/playlists",
    request_body = CreatePlaylistDto,
    responses(
        (status = 201, description = "Playlist created", body = Playlist),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn create_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePlaylistDto>,
) -> Result<(StatusCode, Json<Playlist>), AppError> {
    let playlist = PlaylistService::create(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// Get a playlist with its videos
///
/// Private playlists are only returned to their owner.
#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlist_id}",
    params(("playlist_id" = PlaylistId, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Playlist", body = PlaylistWithVideos),
        (status = 403, description = "Playlist is private", body = ErrorBody),
        (status = 404, description = "Playlist not found", body = ErrorBody)
    ),
    tag = "Playlists"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_playlist(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(playlist_id): Path<PlaylistId>,
) -> Result<Json<PlaylistWithVideos>, AppError> {
    let viewer = auth_user.map(|u| u.id());
    let playlist = PlaylistService::get(&state.db, playlist_id, viewer).await?;
    Ok(Json(playlist))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/user/{username}",
    params(("username" = String, Path, description = "Owner username")),
    responses(
        (status = 200, description = "Public playlists of the user", body = Vec<Playlist>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn get_user_playlists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Playlist>>, AppError> {
    let playlists = PlaylistService::list_public_by_username(&state.db, &username).await?;
    Ok(Json(playlists))
}

#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlist_id}",
    params(("playlist_id" = PlaylistId, Path, description = "Playlist id")),
    request_body = UpdatePlaylistDto,
    responses(
        (status = 200, description = "Playlist updated", body = Playlist),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Playlist not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn update_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(playlist_id): Path<PlaylistId>,
    ValidatedJson(dto): ValidatedJson<UpdatePlaylistDto>,
) -> Result<Json<Playlist>, AppError> {
    let playlist = PlaylistService::update(&state.db, playlist_id, auth_user.id(), dto).await?;
    Ok(Json(playlist))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlist_id}",
    params(("playlist_id" = PlaylistId, Path, description = "Playlist id")),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Playlist not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn delete_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(playlist_id): Path<PlaylistId>,
) -> Result<StatusCode, AppError> {
    PlaylistService::delete(&state.db, playlist_id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlist_id}/toggle-privacy",
    params(("playlist_id" = PlaylistId, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Privacy toggled", body = Playlist),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Playlist not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn toggle_playlist_privacy(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(playlist_id): Path<PlaylistId>,
) -> Result<Json<Playlist>, AppError> {
    let playlist = PlaylistService::toggle_privacy(&state.db, playlist_id, auth_user.id()).await?;
    Ok(Json(playlist))
}

#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlist_id}/videos/{video_id}",
    params(
        ("playlist_id" = PlaylistId, Path, description = "Playlist id"),
        ("video_id" = VideoId, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Video added", body = PlaylistWithVideos),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Playlist or video not found", body = ErrorBody),
        (status = 409, description = "Video already in playlist", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn add_video_to_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((playlist_id, video_id)): Path<(PlaylistId, VideoId)>,
) -> Result<Json<PlaylistWithVideos>, AppError> {
    let playlist =
        PlaylistService::add_video(&state.db, playlist_id, video_id, auth_user.id()).await?;
    Ok(Json(playlist))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlist_id}/videos/{video_id}",
    params(
        ("playlist_id" = PlaylistId, Path, description = "Playlist id"),
        ("video_id" = VideoId, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Video removed", body = PlaylistWithVideos),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Playlist not found or video not in it", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Playlists"
)]
#[instrument(skip(state))]
pub async fn remove_video_from_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((playlist_id, video_id)): Path<(PlaylistId, VideoId)>,
) -> Result<Json<PlaylistWithVideos>, AppError> {
    let playlist =
        PlaylistService::remove_video(&state.db, playlist_id, video_id, auth_user.id()).await?;
    Ok(Json(playlist))
}
