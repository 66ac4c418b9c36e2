//! Storage trait definitions and error types.

use async_trait::async_trait;
use reely_core::{AppError, MediaRef};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Backend-agnostic publish surface for processed media.
///
/// One implementation is active per deployment. `publish_bytes` and
/// `publish_file` write an asset under `key`; `stored_ref` builds the
/// reference that is persisted with the video row; `sign` resolves an
/// object key to a time-limited URL on the read path.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Publish an in-memory asset under `key`.
    async fn publish_bytes(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()>;

    /// Publish a file already staged on local disk under `key`.
    async fn publish_file(&self, key: &str, content_type: &str, path: &Path) -> StorageResult<()>;

    /// Resolve `key` to a client-usable URL valid for `expires_in`.
    ///
    /// Backends with stable public URLs ignore the expiry.
    async fn sign(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete the asset under `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an asset exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// The reference to persist for an asset published under `key`.
    fn stored_ref(&self, key: &str) -> MediaRef;
}
