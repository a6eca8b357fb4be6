//! Uploaded image storage.
//!
//! Images are stored by path (`<folder>/<unix-millis>-<sanitized-name>`)
//! and addressed by the public URL the site serves them under. The
//! [`MediaStore`] trait is the seam; [`FsMediaStore`] writes to a local
//! directory that the public site mounts at `/media`.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use thiserror::Error;
use tracing::instrument;

use crate::config::MediaConfig;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted as images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];

/// Errors from media storage.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The upload has no bytes.
    #[error("uploaded file is empty")]
    Empty,

    /// The upload exceeds [`MAX_UPLOAD_BYTES`].
    #[error("uploaded file is too large ({0} bytes)")]
    TooLarge(usize),

    /// The file name does not look like an image.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// The storage path escapes the media root.
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    /// Writing the file failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object storage for uploaded images.
pub trait MediaStore: Send + Sync {
    /// Store `bytes` at `path` (relative to the store root).
    fn upload(&self, path: &str, bytes: Bytes)
    -> impl Future<Output = Result<(), MediaError>> + Send;

    /// Public URL for a stored path.
    fn public_url(&self, path: &str) -> String;

    /// Validate an image upload, store it under `folder`, and return its URL.
    fn upload_image(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> impl Future<Output = Result<String, MediaError>> + Send {
        async move {
            validate_image(file_name, &bytes)?;
            let path = storage_path(folder, file_name, chrono::Utc::now().timestamp_millis());
            self.upload(&path, bytes).await?;
            Ok(self.public_url(&path))
        }
    }
}

/// Media store backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
    base_url: String,
}

impl FsMediaStore {
    /// Create a store rooted at `config.dir`.
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.dir.clone(),
            base_url: config.base_url.clone(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, MediaError> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !is_plain {
            return Err(MediaError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for FsMediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, path: &str, bytes: Bytes) -> Result<(), MediaError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        tracing::info!(path, "Stored upload");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Reject empty, oversized, or non-image uploads.
///
/// # Errors
///
/// Returns the matching [`MediaError`] variant.
pub fn validate_image(file_name: &str, bytes: &[u8]) -> Result<(), MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(MediaError::TooLarge(bytes.len()));
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaError::UnsupportedType(file_name.to_string()));
    }
    Ok(())
}

/// Storage path `<folder>/<millis>-<sanitized-name>`.
#[must_use]
pub fn storage_path(folder: &str, file_name: &str, millis: i64) -> String {
    format!(
        "{}/{millis}-{}",
        folder.trim_matches('/'),
        sanitize_file_name(file_name)
    )
}

/// Lowercase the name and replace anything outside `[a-z0-9._-]` with `-`.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    // Browsers may send a full client path
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        let c = c.to_ascii_lowercase();
        if c == '.' {
            if out.ends_with('-') {
                out.pop();
            }
            out.push(c);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed = out.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(root: &Path) -> FsMediaStore {
        FsMediaStore::new(&MediaConfig {
            dir: root.to_path_buf(),
            base_url: "/media".to_string(),
        })
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My Tote (1).JPG"), "my-tote-1.jpg");
        assert_eq!(sanitize_file_name("C:\\Users\\aki\\photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("???"), "upload");
    }

    #[test]
    fn test_storage_path_layout() {
        assert_eq!(
            storage_path("products/", "Side View.webp", 1_700_000_000_000),
            "products/1700000000000-side-view.webp"
        );
    }

    #[test]
    fn test_validate_image() {
        assert!(matches!(validate_image("a.png", b""), Err(MediaError::Empty)));
        assert!(matches!(
            validate_image("notes.txt", b"hello"),
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(validate_image("a.JPEG", b"\xff\xd8").is_ok());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = store(Path::new("media"));
        assert!(matches!(
            store.resolve("../etc/passwd"),
            Err(MediaError::InvalidPath(_))
        ));
        assert!(matches!(store.resolve("/abs.png"), Err(MediaError::InvalidPath(_))));
        assert!(store.resolve("events/1-a.png").is_ok());
    }

    #[tokio::test]
    async fn test_upload_image_writes_file_and_returns_url() {
        let root = std::env::temp_dir().join(format!("tezukuri-media-{}", uuid::Uuid::new_v4()));
        let store = store(&root);

        let url = store
            .upload_image("events", "Poster.png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();

        assert!(url.starts_with("/media/events/"));
        assert!(url.ends_with("-poster.png"));
        let stored = root.join(url.trim_start_matches("/media/"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"\x89PNG");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
