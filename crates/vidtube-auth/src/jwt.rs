//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs. Issuing is a pure function of the claims, the
//! configured secret and the clock. Verification checks the signature and
//! expiry only; whether a refresh token is still the *current* one is decided
//! by the caller against the stored value.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use vidtube_config::JwtConfig;
use vidtube_core::AppError;

use crate::claims::{AccessTokenClaims, RefreshTokenClaims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::internal(err),
            _ => AppError::invalid_token(anyhow!("Invalid or expired token: {err}")),
        }
    }
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn now() -> usize {
    Utc::now().timestamp() as usize
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verifies signature and expiry of `token` against `secret` and decodes its claims.
pub fn verify<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    })
}

/// Creates an access token carrying `{id, email, username}`.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    username: &str,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let iat = now();
    let claims = AccessTokenClaims {
        id: user_id,
        email: email.to_string(),
        username: username.to_string(),
        exp: iat + jwt_config.access_token_expiry as usize,
        iat,
    };

    sign(&claims, &jwt_config.access_secret)
}

/// Creates a refresh token carrying `{id}` and a unique `jti`.
pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let iat = now();
    let claims = RefreshTokenClaims {
        id: user_id,
        exp: iat + jwt_config.refresh_token_expiry as usize,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &jwt_config.refresh_secret)
}

pub fn verify_access_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<AccessTokenClaims, TokenError> {
    verify(token, &jwt_config.access_secret)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    verify(token, &jwt_config.refresh_secret)
}

/// Issues a new access/refresh pair for a user.
pub fn issue_token_pair(
    user_id: Uuid,
    email: &str,
    username: &str,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: create_access_token(user_id, email, username, jwt_config)?,
        refresh_token: create_refresh_token(user_id, jwt_config)?,
    })
}
