//! Persistence for credentials and the per-user refresh token.
//!
//! The session lifecycle (login, refresh, logout, the session middleware)
//! only talks to a [`CredentialStore`], so it can run against Postgres in
//! production and against [`InMemoryCredentialStore`] in tests.

use async_trait::async_trait;
use sqlx::PgPool;
use vidtube_core::AppError;
use vidtube_models::users::USER_COLUMNS;
use vidtube_models::{User, UserCredentials, UserId};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks a user up by username or email, whichever is given.
    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserCredentials>, AppError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserCredentials>, AppError>;

    /// Public profile, never carrying the password hash or refresh token.
    async fn profile(&self, id: UserId) -> Result<Option<User>, AppError>;

    /// Overwrites (or with `None`, clears) the stored refresh token.
    async fn set_refresh_token(&self, id: UserId, token: Option<&str>) -> Result<(), AppError>;

    /// Replaces the stored refresh token only if it still equals `expected`.
    /// Returns `false` when another request rotated it first.
    async fn rotate_refresh_token(
        &self,
        id: UserId,
        expected: &str,
        next: &str,
    ) -> Result<bool, AppError>;

    /// Stores a new password hash and revokes the refresh token.
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const CREDENTIAL_COLUMNS: &str = "id, username, email, password_hash, refresh_token";

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserCredentials>, AppError> {
        let sql = format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM users
             WHERE ($1::text IS NOT NULL AND username = $1)
                OR ($2::text IS NOT NULL AND email = $2)
             LIMIT 1"
        );

        let credentials = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(credentials)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserCredentials>, AppError> {
        let sql = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE id = $1");

        let credentials = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(credentials)
    }

    async fn profile(&self, id: UserId) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn set_refresh_token(&self, id: UserId, token: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        id: UserId,
        expected: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $3, updated_at = NOW()
             WHERE id = $1 AND refresh_token = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, refresh_token = NULL, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryCredentialStore;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    struct Entry {
        user: User,
        credentials: UserCredentials,
    }

    /// Map-backed store for exercising the session lifecycle without Postgres.
    #[derive(Default)]
    pub struct InMemoryCredentialStore {
        users: RwLock<HashMap<UserId, Entry>>,
    }

    impl InMemoryCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn insert_user(&self, user: User, password_hash: impl Into<String>) {
            let credentials = UserCredentials {
                id: user.id,
                username: user.username.clone(),
                email: user.email.clone(),
                password_hash: password_hash.into(),
                refresh_token: None,
            };
            self.users
                .write()
                .await
                .insert(user.id, Entry { user, credentials });
        }

        pub async fn remove_user(&self, id: UserId) {
            self.users.write().await.remove(&id);
        }

        pub async fn stored_refresh_token(&self, id: UserId) -> Option<String> {
            self.users
                .read()
                .await
                .get(&id)
                .and_then(|entry| entry.credentials.refresh_token.clone())
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn find_by_login(
            &self,
            username: Option<&str>,
            email: Option<&str>,
        ) -> Result<Option<UserCredentials>, AppError> {
            let users = self.users.read().await;
            let found = users.values().find(|entry| {
                username.is_some_and(|u| entry.credentials.username == u)
                    || email.is_some_and(|e| entry.credentials.email == e)
            });
            Ok(found.map(|entry| entry.credentials.clone()))
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<UserCredentials>, AppError> {
            let users = self.users.read().await;
            Ok(users.get(&id).map(|entry| entry.credentials.clone()))
        }

        async fn profile(&self, id: UserId) -> Result<Option<User>, AppError> {
            let users = self.users.read().await;
            Ok(users.get(&id).map(|entry| entry.user.clone()))
        }

        async fn set_refresh_token(
            &self,
            id: UserId,
            token: Option<&str>,
        ) -> Result<(), AppError> {
            if let Some(entry) = self.users.write().await.get_mut(&id) {
                entry.credentials.refresh_token = token.map(str::to_string);
            }
            Ok(())
        }

        async fn rotate_refresh_token(
            &self,
            id: UserId,
            expected: &str,
            next: &str,
        ) -> Result<bool, AppError> {
            let mut users = self.users.write().await;
            match users.get_mut(&id) {
                Some(entry) if entry.credentials.refresh_token.as_deref() == Some(expected) => {
                    entry.credentials.refresh_token = Some(next.to_string());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), AppError> {
            if let Some(entry) = self.users.write().await.get_mut(&id) {
                entry.credentials.password_hash = password_hash.to_string();
                entry.credentials.refresh_token = None;
            }
            Ok(())
        }
    }
}
