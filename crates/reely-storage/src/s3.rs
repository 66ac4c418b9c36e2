use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload};
use reely_core::MediaRef;
use std::path::Path;
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the environment; bucket and region are explicit.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    fn put_options(content_type: &str) -> PutOptions {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        PutOptions {
            attributes,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn publish_bytes(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = ObjectPath::from(key.to_string());
        let payload = PutPayload::from(Bytes::from(data));

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, payload, Self::put_options(content_type))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 publish failed"
                );
                StorageError::PublishFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 publish successful"
        );

        Ok(())
    }

    async fn publish_file(&self, key: &str, content_type: &str, source: &Path) -> StorageResult<()> {
        // Single put; the payload is bounded by the configured upload size cap.
        let data = tokio::fs::read(source).await.map_err(|e| {
            StorageError::PublishFailed(format!(
                "Failed to read staged file {}: {}",
                source.display(),
                e
            ))
        })?;

        self.publish_bytes(key, content_type, data).await
    }

    async fn sign(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = ObjectPath::from(key.to_string());

        let url = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        Ok(url.to_string())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = ObjectPath::from(key.to_string());
        let start = std::time::Instant::now();

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = ObjectPath::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn stored_ref(&self, key: &str) -> MediaRef {
        MediaRef::object(self.bucket.clone(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stored_ref_is_object() {
        let storage = S3Storage::new(
            "reely-media".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
        .await
        .unwrap();

        let r = storage.stored_ref("landscape/deadbeef.mp4");
        assert_eq!(r.object_key(), Some("landscape/deadbeef.mp4"));
        assert_eq!(r.public_url(), None);
    }

    #[tokio::test]
    async fn test_https_endpoint_disallows_http() {
        // Builder accepts an https endpoint without enabling allow_http.
        let storage = S3Storage::new(
            "reely-media".to_string(),
            "nyc3".to_string(),
            Some("https://nyc3.digitaloceanspaces.com".to_string()),
        )
        .await;
        assert!(storage.is_ok());
    }
}
