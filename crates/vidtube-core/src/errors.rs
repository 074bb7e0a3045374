//! Application error type and its HTTP rendering.
//!
//! Every handler returns `Result<_, AppError>`. The [`ErrorKind`] decides the
//! status code and the machine-readable `error` code; the wrapped
//! [`anyhow::Error`] carries the human-readable message.
//!
//! Internal errors are logged in full and replaced with a generic message so
//! database or driver details never reach the client.

use std::fmt;

use anyhow::anyhow;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::media::MediaError;

/// Classification of every failure the API can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request (bad JSON, bad multipart, bad query parameter).
    BadRequest,
    /// A field was missing, blank or out of range.
    Validation,
    /// Unknown login or wrong password.
    InvalidCredentials,
    /// No access or refresh token was presented.
    MissingToken,
    /// A token failed signature, expiry or structural checks.
    InvalidToken,
    /// A refresh token verified but is not the one stored for the user.
    TokenMismatch,
    /// A token verified but its user no longer exists.
    UnknownUser,
    /// The caller does not own the resource.
    Forbidden,
    NotFound,
    Conflict,
    /// The media store failed.
    Upstream,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::TokenMismatch
            | Self::UnknownUser => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Upstream => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Validation => "validation_error",
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::TokenMismatch => "token_mismatch",
            Self::UnknownUser => "unknown_user",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Upstream => "upstream_failure",
            Self::Internal => "internal_error",
        }
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = 404)]
    pub status_code: u16,
    #[schema(example = "not_found")]
    pub error: String,
    #[schema(example = "Video not found")]
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: anyhow::Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn bad_request<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::BadRequest, err)
    }

    pub fn validation<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::Validation, err)
    }

    pub fn invalid_credentials<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::InvalidCredentials, err)
    }

    pub fn missing_token<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::MissingToken, err)
    }

    pub fn invalid_token<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::InvalidToken, err)
    }

    pub fn token_mismatch<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::TokenMismatch, err)
    }

    pub fn unknown_user<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::UnknownUser, err)
    }

    pub fn forbidden<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::Forbidden, err)
    }

    pub fn not_found<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn conflict<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::Conflict, err)
    }

    pub fn upstream<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::Upstream, err)
    }

    pub fn internal<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::new(ErrorKind::Internal, err)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self.kind {
            ErrorKind::Internal => "Something went wrong while processing the request".to_string(),
            _ => self.error.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.kind.code(), self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::Internal => tracing::error!(error = ?self.error, "internal error"),
            ErrorKind::Upstream => tracing::warn!(error = %self.error, "media store failure"),
            _ => {}
        }

        let status = self.status();
        let body = ErrorBody {
            success: false,
            status_code: status.as_u16(),
            error: self.kind.code().to_string(),
            message: self.public_message(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return AppError::not_found(anyhow!("Resource not found"));
        }

        let unique_violation = err
            .as_database_error()
            .and_then(|db_err| db_err.is_unique_violation().then(|| db_err.constraint()))
            .map(|constraint| constraint.unwrap_or("unique").to_string());

        match unique_violation {
            Some(constraint) => {
                AppError::conflict(anyhow!("Resource already exists ({constraint})"))
            }
            None => AppError::internal(err),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(anyhow!("{}", crate::validation::describe(&errors)))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::bad_request(anyhow!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::MissingFile(_) | MediaError::Io(_) => AppError::internal(err),
            _ => AppError::upstream(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_auth_failures_map_to_unauthorized() {
        for kind in [
            ErrorKind::InvalidCredentials,
            ErrorKind::MissingToken,
            ErrorKind::InvalidToken,
            ErrorKind::TokenMismatch,
            ErrorKind::UnknownUser,
        ] {
            assert_eq!(kind.status(), StatusCode::UNAUTHORIZED, "{kind:?}");
        }
    }

    #[test]
    fn test_conventional_status_codes() {
        assert_eq!(ErrorKind::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorKind::Upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal(anyhow!("connection refused on 10.0.0.3:5432"));
        assert!(!err.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn test_media_failure_is_upstream() {
        let err: AppError = MediaError::Rejected {
            status: 401,
            message: "bad api key".to_string(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::forbidden(anyhow!("Not the owner")).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 403);
        assert_eq!(body["error"], "forbidden");
        assert_eq!(body["message"], "Not the owner");
        assert!(body["data"].is_null());
    }
}
