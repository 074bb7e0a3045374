//! Media storage abstraction.
//!
//! Avatars, cover images, thumbnails and video files are handed to a
//! [`MediaStore`] as a local file path. The store returns a durable URL and a
//! `public_id` that is later used to delete the asset.
//!
//! The production backend (Cloudinary) lives in the API crate; this module
//! defines the seam plus [`LocalMediaStore`], a filesystem backend used in
//! development and tests.
//!
//! # Example
//!
//! ```ignore
//! use vidtube_core::media::{LocalMediaStore, MediaKind, MediaStore};
//!
//! let store = LocalMediaStore::new("public/media", "http://localhost:8000/media");
//! let stored = store.upload(Path::new("public/temp/abc.png"), MediaKind::Image).await?;
//! store.delete(&stored.public_id, MediaKind::Image).await?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
    /// Playback length in seconds, when the backend reports one.
    pub duration: Option<f64>,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid media id: {0}")]
    InvalidId(String),

    #[error("media service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("media service unreachable: {0}")]
    Transport(String),

    #[error("unexpected media service response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads the file at `path`. The file itself is left in place.
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaError>;

    /// Deletes a previously stored asset. Deleting an unknown id succeeds.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<(), MediaError>;
}

/// Deletes an asset, logging instead of failing.
///
/// Used for cleanup after the database row is already gone or when a
/// multi-file operation fails halfway.
pub async fn delete_best_effort(store: &dyn MediaStore, public_id: &str, kind: MediaKind) {
    if let Err(e) = store.delete(public_id, kind).await {
        tracing::warn!(public_id = %public_id, kind = %kind, error = %e, "Failed to delete media asset");
    }
}

/// Filesystem-backed media store.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn validate_id(public_id: &str) -> Result<(), MediaError> {
        let valid_chars = public_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'));

        if public_id.is_empty()
            || public_id.contains("..")
            || public_id.starts_with('/')
            || !valid_chars
        {
            return Err(MediaError::InvalidId(public_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaError> {
        if !fs::try_exists(path).await? {
            return Err(MediaError::MissingFile(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();

        let public_id = format!("{}/{}{}", kind, Uuid::new_v4(), extension);
        let target = self.root.join(&public_id);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(path, &target).await?;

        Ok(StoredMedia {
            url: format!("{}/{}", self.base_url, public_id),
            public_id,
            duration: None,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> Result<(), MediaError> {
        Self::validate_id(public_id)?;

        match fs::remove_file(self.root.join(public_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_copies_file_and_returns_url() {
        let src_dir = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let source = src_dir.path().join("avatar.PNG");
        fs::write(&source, b"png-bytes").await.unwrap();

        let store = LocalMediaStore::new(media_dir.path(), "http://localhost:8000/media/");
        let stored = store.upload(&source, MediaKind::Image).await.unwrap();

        assert!(stored.public_id.starts_with("image/"));
        assert!(stored.public_id.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:8000/media/{}", stored.public_id)
        );
        let copied = fs::read(media_dir.path().join(&stored.public_id)).await.unwrap();
        assert_eq!(copied, b"png-bytes");
        assert!(fs::try_exists(&source).await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let media_dir = tempdir().unwrap();
        let store = LocalMediaStore::new(media_dir.path(), "http://localhost/media");
        let result = store
            .upload(Path::new("/definitely/not/here.mp4"), MediaKind::Video)
            .await;
        assert!(matches!(result, Err(MediaError::MissingFile(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let src_dir = tempdir().unwrap();
        let media_dir = tempdir().unwrap();
        let source = src_dir.path().join("clip.mp4");
        fs::write(&source, b"video").await.unwrap();

        let store = LocalMediaStore::new(media_dir.path(), "http://localhost/media");
        let stored = store.upload(&source, MediaKind::Video).await.unwrap();

        store.delete(&stored.public_id, MediaKind::Video).await.unwrap();
        assert!(!fs::try_exists(media_dir.path().join(&stored.public_id)).await.unwrap());
        store.delete(&stored.public_id, MediaKind::Video).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_rejects_path_traversal() {
        let media_dir = tempdir().unwrap();
        let store = LocalMediaStore::new(media_dir.path(), "http://localhost/media");
        let result = store.delete("../../etc/passwd", MediaKind::Image).await;
        assert!(matches!(result, Err(MediaError::InvalidId(_))));
    }
}
