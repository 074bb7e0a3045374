use std::sync::Arc;

use sqlx::PgPool;
use vidtube_config::{AppConfig, CookieConfig, JwtConfig, MediaConfig};
use vidtube_core::{LocalMediaStore, MediaError, MediaStore};
use vidtube_db::{init_db_pool, run_migrations};

use crate::modules::auth::store::{CredentialStore, PgCredentialStore};
use crate::utils::cloudinary::CloudinaryStore;

/// Shared, cheaply cloneable handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub credentials: Arc<dyn CredentialStore>,
    pub media: Arc<dyn MediaStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Result<Self, MediaError> {
        let media = build_media_store(&config.media)?;

        Ok(Self {
            credentials: Arc::new(PgCredentialStore::new(db.clone())),
            db,
            config: Arc::new(config),
            media,
        })
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = media;
        self
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.config.jwt
    }

    pub fn cookies(&self) -> &CookieConfig {
        &self.config.cookie
    }
}

pub fn build_media_store(config: &MediaConfig) -> Result<Arc<dyn MediaStore>, MediaError> {
    match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!(cloud = %cloudinary.cloud_name, "Using Cloudinary media store");
            Ok(Arc::new(CloudinaryStore::new(cloudinary.clone())?))
        }
        None => {
            tracing::info!(dir = %config.local_dir.display(), "Using local media store");
            Ok(Arc::new(LocalMediaStore::new(
                config.local_dir.clone(),
                config.local_base_url.clone(),
            )))
        }
    }
}

/// Connects the database, applies migrations and builds the state.
pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let db = init_db_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    Ok(AppState::new(db, config)?)
}
