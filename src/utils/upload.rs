//! Staging of multipart uploads on local disk.
//!
//! File fields are streamed chunk by chunk into the temp directory under a
//! random name, then handed to the [`MediaStore`]. A [`StagedFile`] deletes
//! its temp file when dropped, so staged files never outlive the request,
//! whether the upload succeeded, failed or was never attempted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::anyhow;
use axum::extract::Multipart;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use vidtube_core::{AppError, MediaKind, MediaStore, StoredMedia};

use crate::metrics::track_media_upload;

/// A multipart file written to the temp directory.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub original_name: Option<String>,
    pub size: u64,
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

/// Text fields and staged files of a multipart request.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, StagedFile>,
}

/// Keeps a short alphanumeric extension from the client's file name.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

impl MultipartForm {
    /// Reads every field. Fields with a file name are staged in `temp_dir`,
    /// everything else is kept as text. Empty file fields are ignored.
    pub async fn read(mut multipart: Multipart, temp_dir: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(temp_dir).await?;

        let mut form = Self::default();

        while let Some(mut field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(original_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };

            let path = temp_dir.join(format!("{}{}", Uuid::new_v4(), extension_of(&original_name)));
            let mut staged = StagedFile {
                path,
                original_name: Some(original_name),
                size: 0,
            };

            let mut file = fs::File::create(&staged.path).await?;
            while let Some(chunk) = field.chunk().await? {
                file.write_all(&chunk).await?;
                staged.size += chunk.len() as u64;
            }
            file.flush().await?;

            tracing::debug!(field = %name, size = staged.size, "Staged upload");

            if staged.size > 0 {
                form.files.insert(name, staged);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field, empty string when absent.
    pub fn text_or_default(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn take_file(&mut self, name: &str) -> Option<StagedFile> {
        self.files.remove(name)
    }

    pub fn require_file(&mut self, name: &str) -> Result<StagedFile, AppError> {
        self.take_file(name)
            .ok_or_else(|| AppError::validation(anyhow!("{name} file is required")))
    }
}

/// Uploads a staged file and removes it from disk, whatever the outcome.
pub async fn store_staged(
    store: &dyn MediaStore,
    staged: StagedFile,
    kind: MediaKind,
) -> Result<StoredMedia, AppError> {
    let start = Instant::now();
    let result = store.upload(&staged.path, kind).await;
    let elapsed = start.elapsed().as_secs_f64();
    drop(staged);

    match result {
        Ok(media) => {
            track_media_upload(kind.as_str(), true, elapsed);
            tracing::info!(public_id = %media.public_id, kind = %kind, "Media uploaded");
            Ok(media)
        }
        Err(e) => {
            track_media_upload(kind.as_str(), false, elapsed);
            Err(e.into())
        }
    }
}
