#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageError, StorageResult};
use reely_core::{Config, StorageMode};
use std::sync::Arc;

/// Create the storage backend selected by configuration.
///
/// `Inline` deployments publish video files through the local backend;
/// data-URI encoding applies to thumbnails only and happens before storage
/// is involved.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_mode() {
        #[cfg(feature = "storage-s3")]
        StorageMode::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageMode::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageMode::Local | StorageMode::Inline => {
            let assets_root = config.assets_root().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("ASSETS_ROOT not configured".to_string())
            })?;
            let public_base_url = config.public_base_url().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("PUBLIC_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(assets_root, public_base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageMode::Local | StorageMode::Inline => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
