//! Local file storage for admin uploads
//!
//! Files are written under the configured directory with a generated
//! `public_id` and served back under `/uploads/<public_id>`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::config::UploadConfig;
use crate::utils::errors::{ConnectHubError, Result};
use crate::utils::helpers::generate_random_string;

/// Route prefix the upload directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub public_id: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub public_id: String,
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    directory: PathBuf,
    public_base_url: String,
    max_file_size_bytes: u64,
    allowed_content_types: Vec<String>,
}

/// Stored extension for an accepted content type
///
/// The client's filename never picks the extension: the static file server
/// derives `Content-Type` from it. Anything unlisted, scriptable SVG
/// included, is stored as an opaque download.
fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

impl UploadStorage {
    pub fn new(config: &UploadConfig, public_base_url: &str) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_file_size_bytes: config.max_file_size_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_directory(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;
        Ok(())
    }

    /// Whether a content type is accepted; entries like `image/*` match a family
    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.to_ascii_lowercase();
        self.allowed_content_types.iter().any(|allowed| match allowed.strip_suffix("/*") {
            Some(family) => content_type
                .split_once('/')
                .map_or(false, |(kind, _)| kind == family),
            None => *allowed == content_type,
        })
    }

    fn check(&self, content_type: &str, size: u64) -> Result<()> {
        if size == 0 {
            return Err(ConnectHubError::Upload("File is empty".to_string()));
        }
        if size > self.max_file_size_bytes {
            return Err(ConnectHubError::Upload(format!(
                "File is too large ({} bytes, limit {} bytes)",
                size, self.max_file_size_bytes
            )));
        }
        if !self.accepts(content_type) {
            return Err(ConnectHubError::Upload(format!("File type {} is not allowed", content_type)));
        }
        Ok(())
    }

    /// Map a public id onto a path inside the upload directory
    fn resolve(&self, public_id: &str) -> Result<PathBuf> {
        let safe = !public_id.is_empty()
            && !public_id.starts_with('.')
            && !public_id.contains("..")
            && public_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');

        if !safe {
            return Err(ConnectHubError::InvalidInput(format!("Invalid file id: {}", public_id)));
        }
        Ok(self.directory.join(public_id))
    }

    pub fn public_url(&self, public_id: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_ROUTE, public_id)
    }

    /// Store an uploaded file and return where it can be fetched
    pub async fn save(&self, filename: Option<&str>, content_type: &str, bytes: &[u8]) -> Result<UploadedFile> {
        let size = bytes.len() as u64;
        self.check(content_type, size)?;

        let public_id = format!(
            "{}-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            generate_random_string(12),
            extension_for(content_type)
        );

        self.ensure_directory().await?;
        let path = self.resolve(&public_id)?;
        tokio::fs::write(&path, bytes).await?;

        info!(
            public_id = %public_id,
            original_name = filename.unwrap_or_default(),
            size = size,
            content_type = content_type,
            "File uploaded"
        );
        Ok(UploadedFile {
            url: self.public_url(&public_id),
            public_id,
            content_type: content_type.to_string(),
            size,
        })
    }

    /// Remove a stored file, returning whether it existed
    pub async fn delete(&self, public_id: &str) -> Result<bool> {
        let path = self.resolve(public_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(public_id = public_id, "File deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(public_id = public_id, "File to delete was not found");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> UploadStorage {
        UploadStorage::new(
            &UploadConfig {
                directory: dir.path().to_string_lossy().to_string(),
                max_file_size_bytes: 16,
                allowed_content_types: vec!["image/*".to_string(), "application/pdf".to_string()],
            },
            "http://localhost:3000/",
        )
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let uploaded = storage.save(Some("Logo.PNG"), "image/png", b"\x89PNG....").await.unwrap();
        assert!(uploaded.public_id.ends_with(".png"));
        assert_eq!(uploaded.url, format!("http://localhost:3000/uploads/{}", uploaded.public_id));
        assert!(dir.path().join(&uploaded.public_id).exists());

        assert!(storage.delete(&uploaded.public_id).await.unwrap());
        assert!(!storage.delete(&uploaded.public_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_size_and_type() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        assert_matches!(storage.save(None, "image/png", &[0u8; 17]).await, Err(ConnectHubError::Upload(_)));
        assert_matches!(storage.save(None, "text/html", b"<p>").await, Err(ConnectHubError::Upload(_)));
        assert_matches!(storage.save(None, "image/png", b"").await, Err(ConnectHubError::Upload(_)));
    }

    #[tokio::test]
    async fn test_extension_from_content_type() {
        let dir = TempDir::new().unwrap();
        let uploaded = storage(&dir).save(Some("scan"), "application/pdf", b"%PDF-1.4").await.unwrap();
        assert!(uploaded.public_id.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_filename_cannot_choose_served_type() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let uploaded = storage.save(Some("evil.html"), "image/png", b"<script>").await.unwrap();
        assert!(uploaded.public_id.ends_with(".png"), "stored as {}", uploaded.public_id);
        assert!(uploaded.url.ends_with(".png"));

        let svg = storage.save(Some("logo.svg"), "image/svg+xml", b"<svg/>").await.unwrap();
        assert!(svg.public_id.ends_with(".bin"), "stored as {}", svg.public_id);
    }

    #[tokio::test]
    async fn test_delete_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        for id in ["../secret.txt", "a/b.png", ".env", "", "..", "x\\y"] {
            assert_matches!(storage.delete(id).await, Err(ConnectHubError::InvalidInput(_)), "id {:?}", id);
        }
    }

    #[test]
    fn test_wildcard_content_types() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert!(storage.accepts("image/webp"));
        assert!(storage.accepts("IMAGE/JPEG"));
        assert!(storage.accepts("application/pdf"));
        assert!(!storage.accepts("application/zip"));
    }
}
