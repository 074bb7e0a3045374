use anyhow::anyhow;
use tracing::instrument;
use vidtube_auth::{TokenPair, issue_token_pair, verify_refresh_token};
use vidtube_config::JwtConfig;
use vidtube_core::{AppError, hash_password_blocking, verify_password_blocking};
use vidtube_models::{ChangePasswordDto, LoginRequest, User, UserCredentials, UserId};

use crate::metrics::{
    track_login_failure, track_login_success, track_refresh_token_reuse, track_token_refresh,
    track_tokens_issued,
};
use crate::modules::auth::store::CredentialStore;

pub struct AuthService;

impl AuthService {
    fn issue(credentials: &UserCredentials, jwt: &JwtConfig) -> Result<TokenPair, AppError> {
        let tokens = issue_token_pair(
            credentials.id.into_inner(),
            &credentials.email,
            &credentials.username,
            jwt,
        )?;
        track_tokens_issued();
        Ok(tokens)
    }

    /// Verifies the password and starts a session, replacing any previous
    /// refresh token.
    #[instrument(skip(store, jwt))]
    pub async fn login(
        store: &dyn CredentialStore,
        jwt: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<(User, TokenPair), AppError> {
        let (username, email) = dto.identifiers();

        let Some(credentials) = store
            .find_by_login(username.as_deref(), email.as_deref())
            .await?
        else {
            track_login_failure("unknown_user");
            return Err(AppError::invalid_credentials(anyhow!("Invalid credentials")));
        };

        let valid =
            verify_password_blocking(dto.password, credentials.password_hash.clone()).await?;
        if !valid {
            track_login_failure("wrong_password");
            return Err(AppError::invalid_credentials(anyhow!("Invalid credentials")));
        }

        let tokens = Self::issue(&credentials, jwt)?;
        store
            .set_refresh_token(credentials.id, Some(&tokens.refresh_token))
            .await?;

        let user = store
            .profile(credentials.id)
            .await?
            .ok_or_else(|| AppError::unknown_user(anyhow!("User no longer exists")))?;

        track_login_success();
        tracing::info!(user_id = %credentials.id, "User logged in");

        Ok((user, tokens))
    }

    /// Exchanges a refresh token for a new pair. The presented token must be
    /// the one currently stored; it stops being valid once rotated.
    #[instrument(skip_all)]
    pub async fn refresh(
        store: &dyn CredentialStore,
        jwt: &JwtConfig,
        presented: Option<String>,
    ) -> Result<TokenPair, AppError> {
        let presented = presented
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::missing_token(anyhow!("Unauthorized request")))?;

        let claims = verify_refresh_token(&presented, jwt).inspect_err(|_| {
            track_token_refresh(false);
        })?;

        let user_id = UserId::from(claims.id);
        let credentials = store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unknown_user(anyhow!("Invalid refresh token")))?;

        if credentials.refresh_token.as_deref() != Some(presented.as_str()) {
            track_refresh_token_reuse();
            tracing::warn!(user_id = %user_id, "Refresh token does not match the stored token");
            return Err(AppError::token_mismatch(anyhow!(
                "Refresh token is expired or used"
            )));
        }

        let tokens = Self::issue(&credentials, jwt)?;
        let rotated = store
            .rotate_refresh_token(user_id, &presented, &tokens.refresh_token)
            .await?;

        if !rotated {
            track_refresh_token_reuse();
            return Err(AppError::token_mismatch(anyhow!(
                "Refresh token is expired or used"
            )));
        }

        track_token_refresh(true);
        Ok(tokens)
    }

    #[instrument(skip(store))]
    pub async fn logout(store: &dyn CredentialStore, user_id: UserId) -> Result<(), AppError> {
        store.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    #[instrument(skip(store))]
    pub async fn change_password(
        store: &dyn CredentialStore,
        user_id: UserId,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let credentials = store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unknown_user(anyhow!("User no longer exists")))?;

        let valid = verify_password_blocking(dto.old_password, credentials.password_hash).await?;
        if !valid {
            return Err(AppError::invalid_credentials(anyhow!("Invalid old password")));
        }

        let password_hash = hash_password_blocking(dto.new_password).await?;
        store.update_password(user_id, &password_hash).await?;

        Ok(())
    }
}
