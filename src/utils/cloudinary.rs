//! Cloudinary-backed [`MediaStore`].
//!
//! Uses the signed REST API directly: `POST {base}/{cloud}/{kind}/upload`
//! and `POST {base}/{cloud}/{kind}/destroy`. Requests are signed by sorting
//! the signed parameters, joining them as `k=v&k=v`, appending the API
//! secret and taking the SHA-256 hex digest.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use vidtube_config::CloudinaryConfig;
use vidtube_core::{MediaError, MediaKind, MediaStore, StoredMedia};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

/// Signature over `params` (excluding `file`, `api_key` and the resource type).
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MediaError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name,
            kind,
            action
        )
    }

    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = sign(&params, &self.config.api_secret);

        params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn send(&self, url: String, form: Form) -> Result<reqwest::Response, MediaError> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(MediaError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(MediaError::MissingFile(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = Utc::now().timestamp().to_string();
        let form = self
            .signed_form(vec![("timestamp", timestamp)])
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self.send(self.endpoint(kind, "upload"), form).await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        Ok(StoredMedia {
            url: body.secure_url,
            public_id: body.public_id,
            duration: body.duration,
        })
    }

    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let form = self.signed_form(vec![
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ]);

        let response = self.send(self.endpoint(kind, "destroy"), form).await?;
        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str) -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base_url: base.to_string(),
        }
    }

    #[test]
    fn test_signature_sorts_parameters() {
        let a = sign(
            &[("timestamp", "100".to_string()), ("public_id", "x".to_string())],
            "secret",
        );
        let b = sign(
            &[("public_id", "x".to_string()), ("timestamp", "100".to_string())],
            "secret",
        );
        assert_eq!(a, b);

        let expected = hex::encode(Sha256::digest(b"public_id=x&timestamp=100secret"));
        assert_eq!(a, expected);
    }

    #[tokio::test]
    async fn test_upload_returns_url_id_and_duration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/video/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "abc123",
                "secure_url": "https://res.cloudinary.test/demo/video/upload/abc123.mp4",
                "duration": 12.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"video-bytes").unwrap();

        let store = CloudinaryStore::new(config(&server.uri())).unwrap();
        let stored = store.upload(&file, MediaKind::Video).await.unwrap();

        assert_eq!(stored.public_id, "abc123");
        assert_eq!(stored.duration, Some(12.5));
        assert!(stored.url.starts_with("https://"));
    }

    #[tokio::test]
    async fn test_upload_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Invalid Signature" }
            })))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"png").unwrap();

        let store = CloudinaryStore::new(config(&server.uri())).unwrap();
        let err = store.upload(&file, MediaKind::Image).await.unwrap_err();

        match err {
            MediaError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_missing_file_skips_request() {
        let server = MockServer::start().await;
        let store = CloudinaryStore::new(config(&server.uri())).unwrap();

        let err = store
            .upload(Path::new("/definitely/not/here.png"), MediaKind::Image)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::MissingFile(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_treats_not_found_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": "not found" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = CloudinaryStore::new(config(&server.uri())).unwrap();
        assert!(store.delete("gone", MediaKind::Image).await.is_ok());
    }
}
