//! Password hashing with bcrypt.
//!
//! Hashing is CPU-bound, so request handlers use the `*_blocking` variants,
//! which run on the blocking pool and only return once the hash is computed.

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {e}")))
}

/// Compares a plaintext password against a stored bcrypt hash.
///
/// A malformed stored hash is reported as an internal error rather than a
/// mismatch.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {e}")))
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password hashing task failed: {e}")))?
}

pub async fn verify_password_blocking(password: String, hashed: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password verification task failed: {e}")))?
}
