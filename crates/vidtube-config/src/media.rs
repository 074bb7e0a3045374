use std::fmt;
use std::path::PathBuf;

use crate::optional;

pub const DEFAULT_CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

/// Credentials for the Cloudinary upload API.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Base URL without the cloud name, overridable for tests.
    pub api_base_url: String,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Where uploads are staged and where they end up.
///
/// When `cloudinary` is `None` uploads are copied into `local_dir` and served
/// from `local_base_url`.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub cloudinary: Option<CloudinaryConfig>,
    pub upload_dir: PathBuf,
    pub local_dir: PathBuf,
    pub local_base_url: String,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let cloudinary = match (
            optional("CLOUD_NAME"),
            optional("CLOUD_API_KEY"),
            optional("CLOUD_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                api_base_url: optional("CLOUD_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_API.to_string()),
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "Cloudinary is partially configured; set CLOUD_NAME, CLOUD_API_KEY and CLOUD_API_SECRET together. Falling back to local media storage"
                );
                None
            }
        };

        Self {
            cloudinary,
            upload_dir: optional("UPLOAD_TEMP_DIR")
                .unwrap_or_else(|| "public/temp".to_string())
                .into(),
            local_dir: optional("LOCAL_MEDIA_DIR")
                .unwrap_or_else(|| "public/media".to_string())
                .into(),
            local_base_url: optional("LOCAL_MEDIA_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8000/media".to_string()),
        }
    }
}
