//! The upload-and-publish pipeline.
//!
//! One code path serves all storage modes. The mode only decides how a
//! thumbnail is staged and which reference is persisted; videos always go
//! through the stage/probe/remux/publish sequence. Publishing happens
//! before the record is persisted, so callers receive the published key
//! and are responsible for a compensating delete when persistence fails.

use reely_core::{AppError, Config, MediaRef, StorageMode, Video, VideoResponse};
use reely_media::{extension_for, random_hex_name, MediaToolchain, UploadValidator};
use reely_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

/// A published asset: the reference to persist, plus the storage key to
/// delete if persistence fails afterwards. Inline thumbnails have no key.
#[derive(Debug, Clone)]
pub struct PublishedAsset {
    pub key: Option<String>,
    pub media_ref: MediaRef,
}

#[derive(Clone)]
pub struct UploadPipeline {
    storage: Arc<dyn Storage>,
    toolchain: Arc<dyn MediaToolchain>,
    storage_mode: StorageMode,
    random_name_bytes: usize,
    presign_ttl: Duration,
    thumbnail_validator: UploadValidator,
    video_validator: UploadValidator,
}

impl UploadPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        toolchain: Arc<dyn MediaToolchain>,
        config: &Config,
    ) -> Self {
        UploadPipeline {
            storage,
            toolchain,
            storage_mode: config.storage_mode(),
            random_name_bytes: config.random_name_bytes(),
            presign_ttl: Duration::from_secs(config.presign_ttl_secs()),
            thumbnail_validator: UploadValidator::for_thumbnails(
                config.max_thumbnail_size_bytes(),
            ),
            video_validator: UploadValidator::for_videos(config.max_video_size_bytes()),
        }
    }

    /// Validate and publish a thumbnail image.
    ///
    /// In inline mode the bytes are encoded into the reference itself and
    /// nothing is written to storage; otherwise the image is published
    /// under a fresh random name.
    pub async fn publish_thumbnail(
        &self,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<PublishedAsset, AppError> {
        let media_type = self.thumbnail_validator.validate(content_type, data.len())?;

        if self.storage_mode == StorageMode::Inline {
            let media_ref = MediaRef::inline(&media_type, &data);
            return Ok(PublishedAsset {
                key: None,
                media_ref,
            });
        }

        let key = format!(
            "{}.{}",
            random_hex_name(self.random_name_bytes)?,
            extension_for(&media_type)
        );
        self.storage
            .publish_bytes(&key, &media_type, data)
            .await?;

        tracing::info!(key = %key, "Published thumbnail");

        Ok(PublishedAsset {
            media_ref: self.storage.stored_ref(&key),
            key: Some(key),
        })
    }

    /// Validate, stage, process, and publish a video file.
    ///
    /// The upload is staged to a temp file, probed for its aspect ratio,
    /// remuxed for faststart playback, and published under an aspect-keyed
    /// prefix. Both temp files are gone by the time this returns, on every
    /// path.
    pub async fn publish_video(
        &self,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<PublishedAsset, AppError> {
        let media_type = self.video_validator.validate(content_type, data.len())?;

        let staged = tempfile::Builder::new()
            .prefix("reely-upload-")
            .suffix(".mp4")
            .tempfile()
            .map_err(|e| AppError::Internal(format!("Failed to create staging file: {}", e)))?;
        tokio::fs::write(staged.path(), &data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;
        drop(data);

        let dimensions = self.toolchain.probe_dimensions(staged.path()).await?;
        let prefix = dimensions.aspect_ratio().key_prefix();

        let processed = self.toolchain.remux_faststart(staged.path()).await?;

        let key = format!(
            "{}/{}.{}",
            prefix,
            random_hex_name(self.random_name_bytes)?,
            extension_for(&media_type)
        );
        let published = self
            .storage
            .publish_file(&key, &media_type, &processed)
            .await;

        if let Err(e) = tokio::fs::remove_file(&processed).await {
            tracing::warn!(
                path = %processed.display(),
                error = %e,
                "Failed to remove processed temp file"
            );
        }

        published?;

        tracing::info!(
            key = %key,
            width = dimensions.width,
            height = dimensions.height,
            "Published video"
        );

        Ok(PublishedAsset {
            media_ref: self.storage.stored_ref(&key),
            key: Some(key),
        })
    }

    /// Resolve a stored reference to a client-usable URL.
    ///
    /// Object references are signed fresh on every read; inline and URL
    /// references are self-contained.
    pub async fn resolve_ref(&self, media_ref: &MediaRef) -> Result<Option<String>, AppError> {
        match media_ref {
            MediaRef::Object { key, .. } => {
                let url = self.storage.sign(key, self.presign_ttl).await?;
                Ok(Some(url))
            }
            other => Ok(other.public_url()),
        }
    }

    /// Resolve a record's references and assemble the client response.
    pub async fn resolve(&self, video: Video) -> Result<VideoResponse, AppError> {
        let thumbnail_url = match &video.thumbnail {
            Some(r) => self.resolve_ref(r).await?,
            None => None,
        };
        let media_url = match &video.media {
            Some(r) => self.resolve_ref(r).await?,
            None => None,
        };
        Ok(VideoResponse::resolved(video, thumbnail_url, media_url))
    }

    /// Probe the storage backend for health checks. Uses `exists` on a
    /// key that never exists, so the backend is exercised without
    /// requiring any object to be present.
    pub async fn storage_health_probe(&self) -> Result<(), AppError> {
        self.storage
            .exists("health-check-non-existent-key")
            .await
            .map(drop)
            .map_err(AppError::from)
    }

    /// Best-effort delete of an already-published asset, used when the
    /// database write after publish fails. Failures are logged, not
    /// surfaced; the orphaned asset is unreachable without its record.
    pub async fn discard(&self, key: &str) {
        match self.storage.delete(key).await {
            Ok(()) => tracing::info!(key = %key, "Discarded orphaned asset"),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to discard orphaned asset")
            }
        }
    }
}
