//! Image storage for uploaded product pictures.
//!
//! Uploads are validated, renamed to a collision-free generated name, and
//! written inside a single configured directory. The stored name is what the
//! product row keeps; deletion tolerates files that are already gone.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use thiserror::Error;

/// File extensions accepted for product images (lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Maximum length kept from the sanitized original file stem.
const MAX_STEM_LENGTH: usize = 40;

/// Errors that can occur while storing an uploaded image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No file was supplied, or it has an empty name or body.
    #[error("image required")]
    Missing,

    /// The file extension is not in the allow-set.
    #[error("unsupported type")]
    UnsupportedType,

    /// Filesystem error while writing or removing the file.
    #[error("storage error: {0}")]
    Io(#[from] io::Error),
}

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename, if any.
    pub file_name: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Filesystem store for product images under one upload directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `upload_dir`.
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// The directory uploads are written to.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await
    }

    /// Validate and persist an upload, returning the stored filename.
    ///
    /// The stored name is `<utc micros timestamp>_<sanitized stem>.<ext>`:
    /// unique within a process even for identical original names, and
    /// bounded in length. The caller stores it verbatim in the product row.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Missing` if no usable file was supplied,
    /// `ImageError::UnsupportedType` for extensions outside the allow-set,
    /// and `ImageError::Io` if the write fails.
    pub async fn save(&self, upload: &ImageUpload) -> Result<String, ImageError> {
        let original = upload.file_name.as_deref().unwrap_or("").trim();
        if original.is_empty() || upload.bytes.is_empty() {
            return Err(ImageError::Missing);
        }

        let sanitized = sanitize_file_name(original);
        let (stem, extension) = sanitized.rsplit_once('.').ok_or(ImageError::UnsupportedType)?;

        let extension = extension.to_ascii_lowercase();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageError::UnsupportedType);
        }

        let stem: String = stem.chars().take(MAX_STEM_LENGTH).collect();

        // Identical names in the same microsecond wait out the tick.
        let stored = loop {
            let timestamp = Utc::now().format("%Y%m%d%H%M%S%6f");
            let candidate = format!("{timestamp}_{stem}.{extension}");
            if !tokio::fs::try_exists(self.upload_dir.join(&candidate)).await? {
                break candidate;
            }
        };

        tokio::fs::write(self.upload_dir.join(&stored), &upload.bytes).await?;

        Ok(stored)
    }

    /// Remove a stored file if present; an already-absent file is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Io` for filesystem failures other than the file
    /// being gone.
    pub async fn delete(&self, filename: &str) -> Result<(), ImageError> {
        if filename.is_empty() {
            return Ok(());
        }
        // Stored names never contain separators; refuse to walk elsewhere.
        if filename.contains(['/', '\\']) {
            tracing::warn!(filename, "refusing to delete image outside upload dir");
            return Ok(());
        }

        match tokio::fs::remove_file(self.upload_dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce a client-supplied filename to a safe base name.
///
/// Path components are dropped, whitespace collapses to underscores, and
/// anything outside `[A-Za-z0-9._-]` is removed; leading and trailing dots
/// and underscores are stripped so names like `..png` cannot smuggle an
/// empty stem through.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_matches(['.', '_']).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("berrystand-images-{}", Uuid::new_v4()));
        ImageStore::new(dir)
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            bytes: Bytes::from_static(b"not actually pixels"),
        }
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_file_name("C:\\photos\\cat.jpg"), "cat.jpg");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo (1).png"), "my_photo_1.png");
        assert_eq!(sanitize_file_name("..png"), "png");
    }

    #[tokio::test]
    async fn test_save_and_delete_round_trip() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let stored = store.save(&upload("berries.jpg")).await.unwrap();
        assert_ne!(stored, "berries.jpg");
        assert!(stored.ends_with(".jpg"));
        assert!(store.upload_dir().join(&stored).exists());

        store.delete(&stored).await.unwrap();
        assert!(!store.upload_dir().join(&stored).exists());

        // Deleting again is a no-op, not an error
        store.delete(&stored).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_lowercases_extension() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let stored = store.save(&upload("SHOUTY.PNG")).await.unwrap();
        assert!(stored.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_save_bounds_long_names() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let long = format!("{}.webp", "x".repeat(200));
        let stored = store.save(&upload(&long)).await.unwrap();
        // timestamp (20) + '_' + stem (<= 40) + ".webp"
        assert!(stored.len() <= 20 + 1 + 40 + 5);
    }

    #[tokio::test]
    async fn test_identical_names_do_not_collide() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let first = store.save(&upload("twin.png")).await.unwrap();
        let second = store.save(&upload("twin.png")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_rejects_missing_file() {
        let store = temp_store();

        let none = ImageUpload {
            file_name: None,
            bytes: Bytes::from_static(b"data"),
        };
        assert!(matches!(store.save(&none).await, Err(ImageError::Missing)));

        let empty_name = upload("   ");
        assert!(matches!(
            store.save(&empty_name).await,
            Err(ImageError::Missing)
        ));

        let empty_body = ImageUpload {
            file_name: Some("ok.png".to_string()),
            bytes: Bytes::new(),
        };
        assert!(matches!(
            store.save(&empty_body).await,
            Err(ImageError::Missing)
        ));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extensions() {
        let store = temp_store();

        for name in ["report.pdf", "script.sh", "noextension", "archive.tar.gz"] {
            assert!(
                matches!(store.save(&upload(name)).await, Err(ImageError::UnsupportedType)),
                "{name} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_traversal_attempt_stays_in_upload_dir() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let stored = store.save(&upload("../../escape.png")).await.unwrap();
        assert!(!stored.contains('/'));
        assert!(store.upload_dir().join(&stored).exists());
    }
}
