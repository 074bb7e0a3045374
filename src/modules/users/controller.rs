use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;
use validator::Validate;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::users::RegisterUserForm;
use vidtube_models::{ChannelProfile, RegisterUserDto, UpdateAccountDto, User, WatchHistoryEntry};

use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::upload::MultipartForm;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body(content = RegisterUserForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Malformed multipart body", body = ErrorBody),
        (status = 409, description = "Username or email already taken", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
        (status = 502, description = "Media upload failed", body = ErrorBody)
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<User>), AppError> {
    let mut form = MultipartForm::read(multipart, &state.config.media.upload_dir).await?;

    let dto = RegisterUserDto {
        username: form.text_or_default("username"),
        email: form.text_or_default("email"),
        fullname: form.text_or_default("fullname"),
        password: form.text_or_default("password"),
    };
    dto.validate()?;

    let avatar = form.require_file("avatar")?;
    let cover_image = form.take_file("coverImage");

    let user =
        UserService::register(&state.db, state.media.as_ref(), dto, avatar, cover_image).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_current_user(auth_user: AuthUser) -> Json<User> {
    Json(auth_user.0)
}

/// Update full name and/or email
#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Account updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Email already taken", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateAccountDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_account(&state.db, auth_user.id(), dto).await?;
    Ok(Json(user))
}

/// Replace the avatar
#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    request_body(content_type = "multipart/form-data", description = "`avatar` file field"),
    responses(
        (status = 200, description = "Avatar updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Missing file", body = ErrorBody),
        (status = 502, description = "Media upload failed", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let mut form = MultipartForm::read(multipart, &state.config.media.upload_dir).await?;
    let staged = form.require_file("avatar")?;

    let user =
        UserService::update_avatar(&state.db, state.media.as_ref(), auth_user.user(), staged)
            .await?;
    Ok(Json(user))
}

/// Replace the cover image
#[utoipa::path(
    patch,
    path = "/api/v1/users/cover-image",
    request_body(content_type = "multipart/form-data", description = "`coverImage` file field"),
    responses(
        (status = 200, description = "Cover image updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Missing file", body = ErrorBody),
        (status = 502, description = "Media upload failed", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let mut form = MultipartForm::read(multipart, &state.config.media.upload_dir).await?;
    let staged = form.require_file("coverImage")?;

    let user =
        UserService::update_cover_image(&state.db, state.media.as_ref(), auth_user.user(), staged)
            .await?;
    Ok(Json(user))
}

/// Public channel page
#[utoipa::path(
    get,
    path = "/api/v1/users/channel/{username}",
    params(("username" = String, Path, description = "Channel username")),
    responses(
        (status = 200, description = "Channel profile", body = ChannelProfile),
        (status = 404, description = "Channel not found", body = ErrorBody)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_channel_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ChannelProfile>, AppError> {
    let profile = UserService::channel_profile(&state.db, &username).await?;
    Ok(Json(profile))
}

/// Current user's watch history
#[utoipa::path(
    get,
    path = "/api/v1/users/watch-history",
    responses(
        (status = 200, description = "Watched videos, most recent first", body = Vec<WatchHistoryEntry>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_watch_history(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WatchHistoryEntry>>, AppError> {
    let history = UserService::watch_history(&state.db, auth_user.id()).await?;
    Ok(Json(history))
}
