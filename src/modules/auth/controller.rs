use anyhow::anyhow;
use axum::{Json, body::Bytes, extract::State};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest,
    TokenResponse,
};

use super::cookies::{REFRESH_TOKEN_COOKIE, with_session_cookies, without_session_cookies};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Log in with username or email
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookies set", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (user, tokens) = AuthService::login(state.credentials.as_ref(), state.jwt(), dto).await?;
    let jar = with_session_cookies(jar, &tokens, state.cookies());

    Ok((
        jar,
        Json(LoginResponse {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// Rotate the refresh token and issue a new access token
///
/// The refresh token is read from the `refreshToken` cookie, or from the
/// JSON body when no cookie is sent.
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body(content = Option<RefreshTokenRequest>, content_type = "application/json"),
    responses(
        (status = 200, description = "New token pair; session cookies replaced", body = TokenResponse),
        (status = 401, description = "Missing, invalid or reused refresh token", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let presented = match jar.get(REFRESH_TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => Some(cookie.value().to_string()),
        _ if body.is_empty() => None,
        _ => {
            serde_json::from_slice::<RefreshTokenRequest>(&body)
                .map_err(|e| AppError::bad_request(anyhow!("Invalid request body: {e}")))?
                .refresh_token
        }
    };

    let tokens = AuthService::refresh(state.credentials.as_ref(), state.jwt(), presented).await?;
    let jar = with_session_cookies(jar, &tokens, state.cookies());

    Ok((
        jar,
        Json(TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// Log out and revoke the refresh token
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Logged out; session cookies cleared", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    AuthService::logout(state.credentials.as_ref(), auth_user.id()).await?;
    let jar = without_session_cookies(jar, state.cookies());

    Ok((jar, Json(MessageResponse::new("User logged out"))))
}

/// Change the current user's password
///
/// Revokes the stored refresh token, so other sessions must log in again.
#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Unauthorized or wrong old password", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::change_password(state.credentials.as_ref(), auth_user.id(), dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
