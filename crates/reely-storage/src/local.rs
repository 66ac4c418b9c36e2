use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use reely_core::MediaRef;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem publisher.
///
/// Assets are written under a public assets root and served by the HTTP
/// layer at `{public_base_url}/assets/{key}`. URLs are stable, so `sign`
/// ignores the requested expiry.
#[derive(Clone)]
pub struct LocalStorage {
    assets_root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `assets_root` - Root directory for published assets (e.g., "/var/lib/reely/assets")
    /// * `public_base_url` - Base URL of the serving host (e.g., "http://localhost:4000")
    pub async fn new(assets_root: impl Into<PathBuf>, public_base_url: String) -> StorageResult<Self> {
        let assets_root = assets_root.into();

        fs::create_dir_all(&assets_root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                assets_root.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            assets_root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a storage key to a filesystem path with security validation.
    ///
    /// Keys containing path traversal sequences that could escape the
    /// assets root are rejected before any filesystem access.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.assets_root.join(key);

        let base_canonical = self.assets_root.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize assets root: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside assets directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Public URL for a published key.
    fn generate_url(&self, key: &str) -> String {
        format!("{}/assets/{}", self.public_base_url, key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn publish_bytes(
        &self,
        key: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::PublishFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::PublishFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::PublishFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage publish successful"
        );

        Ok(())
    }

    async fn publish_file(
        &self,
        key: &str,
        _content_type: &str,
        source: &Path,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let bytes_copied = fs::copy(source, &path).await.map_err(|e| {
            StorageError::PublishFailed(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage file publish successful"
        );

        Ok(())
    }

    async fn sign(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(key)?;
        Ok(self.generate_url(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn stored_ref(&self, key: &str) -> MediaRef {
        MediaRef::url(self.generate_url(key))
    }
}
