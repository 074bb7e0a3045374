//! Session middleware and the authenticated-user extractors.
//!
//! A request is authenticated in four steps:
//!
//! 1. take the access token from the `accessToken` cookie, falling back to
//!    `Authorization: Bearer <token>` (`MissingToken` if neither is present)
//! 2. verify it against the access secret (`InvalidToken`)
//! 3. load the user it names, without secrets (`UnknownUser`)
//! 4. attach the user to the request extensions
//!
//! [`require_auth`] runs those steps as a route layer. Handlers read the
//! result through [`AuthUser`], or `Option<AuthUser>` on routes where a
//! session is optional.

use std::convert::Infallible;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use vidtube_auth::verify_access_token;
use vidtube_core::AppError;
use vidtube_models::{User, UserId};

use crate::modules::auth::cookies::ACCESS_TOKEN_COOKIE;
use crate::state::AppState;

/// The user behind the current session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Cookie first, then the bearer header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthUser, AppError> {
    let token = extract_token(headers)
        .ok_or_else(|| AppError::missing_token(anyhow!("Unauthorized request")))?;

    let claims = verify_access_token(&token, state.jwt())?;

    let user = state
        .credentials
        .profile(UserId::from(claims.id))
        .await?
        .ok_or_else(|| AppError::unknown_user(anyhow!("Invalid access token")))?;

    Ok(AuthUser(user))
}

/// Route layer rejecting requests without a valid session.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = authenticate(req.headers(), &state).await?;
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        authenticate(&parts.headers, state).await
    }
}

/// Any failure to authenticate yields `None`.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(Some(user.clone()));
        }

        Ok(authenticate(&parts.headers, state).await.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken=from-cookie"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_empty_cookie_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken="));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_token(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers).is_none());
        assert!(extract_token(&HeaderMap::new()).is_none());
    }
}
