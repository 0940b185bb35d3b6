//! Object storage for uploaded images.
//!
//! Files live in named buckets. Uploads overwrite an existing object with
//! the same key, so re-uploading a facility photo or an avatar replaces it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Storage bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    /// Facility photos.
    FacilityImages,
    /// User avatars.
    Avatars,
}

impl Bucket {
    /// Bucket name as used in paths and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FacilityImages => "facility-images",
            Self::Avatars => "avatars",
        }
    }
}

/// Uploaded file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Object key inside the bucket.
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file, replacing any object stored under the same key.
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile>;

    /// Delete a file.
    async fn delete(&self, bucket: Bucket, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, bucket: Bucket, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, bucket: Bucket, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn path(&self, bucket: Bucket, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(AppError::BadRequest(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(bucket.as_str()).join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let path = self.path(bucket, key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        tracing::debug!(bucket = bucket.as_str(), key = %key, size = data.len(), "Stored file");

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(bucket, key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> AppResult<()> {
        let path = self.path(bucket, key)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            bucket.as_str(),
            key
        )
    }

    async fn exists(&self, bucket: Bucket, key: &str) -> AppResult<bool> {
        let path = self.path(bucket, key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

/// Build the object key for an upload owned by `owner_id`.
///
/// The key is stable per owner and extension, so a new upload replaces the
/// previous one.
#[must_use]
pub fn storage_key(owner_id: &str, original_name: &str) -> String {
    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);

    format!("{owner_id}/image.{extension}")
}
