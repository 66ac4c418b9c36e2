//! End-to-end upload pipeline tests over local storage with a scripted
//! toolchain. Database-backed persistence is covered separately; these
//! tests exercise validation, staging, processing, publishing, and
//! reference resolution.

use async_trait::async_trait;
use reely_api::UploadPipeline;
use reely_core::{
    AppError, BaseConfig, Config, ErrorMetadata, MediaRef, StorageMode, UploadServiceConfig,
    Video,
};
use reely_media::{Dimensions, MediaError, MediaResult, MediaToolchain};
use reely_storage::LocalStorage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// Toolchain double: reports fixed dimensions and "remuxes" by copying
/// the input to the sibling `.processing` path, like the real tool.
struct FakeToolchain {
    dimensions: Option<Dimensions>,
    seen_paths: Mutex<Vec<PathBuf>>,
}

impl FakeToolchain {
    fn with_dimensions(width: u32, height: u32) -> Self {
        FakeToolchain {
            dimensions: Some(Dimensions { width, height }),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        FakeToolchain {
            dimensions: None,
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaToolchain for FakeToolchain {
    async fn probe_dimensions(&self, input: &Path) -> MediaResult<Dimensions> {
        self.seen_paths.lock().unwrap().push(input.to_path_buf());
        self.dimensions.ok_or(MediaError::NoVideoStream)
    }

    async fn remux_faststart(&self, input: &Path) -> MediaResult<PathBuf> {
        let mut os = input.as_os_str().to_os_string();
        os.push(".processing");
        let output = PathBuf::from(os);
        tokio::fs::copy(input, &output).await?;
        self.seen_paths.lock().unwrap().push(output.clone());
        Ok(output)
    }
}

fn test_config(mode: StorageMode, assets_root: &Path) -> Config {
    Config(Box::new(UploadServiceConfig {
        base: BaseConfig {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_expiry_hours: 24,
            environment: "test".to_string(),
        },
        database_url: "postgresql://localhost/reely_test".to_string(),
        storage_mode: mode,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        assets_root: Some(assets_root.to_string_lossy().into_owned()),
        public_base_url: Some("http://localhost:4000".to_string()),
        max_thumbnail_size_bytes: 10 * 1024 * 1024,
        max_video_size_bytes: 1024 * 1024 * 1024,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout_secs: 60,
        presign_ttl_secs: 600,
        random_name_bytes: 16,
    }))
}

async fn pipeline_with(
    mode: StorageMode,
    toolchain: Arc<FakeToolchain>,
) -> (UploadPipeline, TempDir) {
    let assets = TempDir::new().unwrap();
    let config = test_config(mode, assets.path());
    let storage = Arc::new(
        LocalStorage::new(assets.path(), "http://localhost:4000".to_string())
            .await
            .unwrap(),
    );
    (UploadPipeline::new(storage, toolchain, &config), assets)
}

fn published_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfakeimagedata";

#[tokio::test]
async fn inline_thumbnail_produces_data_uri_and_writes_nothing() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, assets) = pipeline_with(StorageMode::Inline, toolchain).await;

    let asset = pipeline
        .publish_thumbnail("image/png", PNG_BYTES.to_vec())
        .await
        .unwrap();

    assert!(asset.key.is_none());
    let url = asset.media_ref.public_url().unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
    assert!(published_files(assets.path()).is_empty());
}

#[tokio::test]
async fn local_thumbnail_publishes_under_random_name() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let asset = pipeline
        .publish_thumbnail("image/jpeg; charset=utf-8", PNG_BYTES.to_vec())
        .await
        .unwrap();

    let key = asset.key.expect("local mode publishes under a key");
    let (stem, ext) = key.split_once('.').unwrap();
    assert_eq!(ext, "jpg");
    // 16 random bytes hex-encode to 32 characters
    assert_eq!(stem.len(), 32);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));

    assert!(assets.path().join(&key).is_file());
    assert_eq!(
        asset.media_ref,
        MediaRef::url(format!("http://localhost:4000/assets/{}", key))
    );
}

#[tokio::test]
async fn thumbnail_rejects_disallowed_content_type() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let err = pipeline
        .publish_thumbnail("image/gif", PNG_BYTES.to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(err.http_status_code(), 400);
    assert!(published_files(assets.path()).is_empty());
}

#[tokio::test]
async fn thumbnail_rejects_oversized_payload() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let err = pipeline
        .publish_thumbnail("image/png", oversized)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PayloadTooLarge(_)));
    assert_eq!(err.http_status_code(), 413);
}

#[tokio::test]
async fn thumbnail_rejects_empty_payload() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let err = pipeline
        .publish_thumbnail("image/png", Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 400);
}

#[tokio::test]
async fn video_publish_prefixes_key_by_aspect_ratio() {
    for (width, height, prefix) in [
        (1920u32, 1080u32, "landscape"),
        (1080, 1920, "portrait"),
        (640, 480, "other"),
    ] {
        let toolchain = Arc::new(FakeToolchain::with_dimensions(width, height));
        let (pipeline, assets) = pipeline_with(StorageMode::Local, toolchain.clone()).await;

        let asset = pipeline
            .publish_video("video/mp4", b"fake mp4 payload".to_vec())
            .await
            .unwrap();

        let key = asset.key.expect("video publish always yields a key");
        assert!(
            key.starts_with(&format!("{}/", prefix)),
            "expected {} prefix in {}",
            prefix,
            key
        );
        assert!(key.ends_with(".mp4"));
        assert!(assets.path().join(&key).is_file());

        // Both the staged upload and the remuxed copy must be cleaned up.
        for path in toolchain.seen_paths() {
            assert!(!path.exists(), "temp file left behind: {}", path.display());
        }
    }
}

#[tokio::test]
async fn video_probe_failure_publishes_nothing() {
    let toolchain = Arc::new(FakeToolchain::failing());
    let (pipeline, assets) = pipeline_with(StorageMode::Local, toolchain.clone()).await;

    let err = pipeline
        .publish_video("video/mp4", b"fake mp4 payload".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MediaTool(_)));
    assert!(published_files(assets.path()).is_empty());
    for path in toolchain.seen_paths() {
        assert!(!path.exists(), "temp file left behind: {}", path.display());
    }
}

#[tokio::test]
async fn video_rejects_non_mp4_content_type() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let err = pipeline
        .publish_video("video/webm", b"fake webm payload".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 400);
}

#[tokio::test]
async fn resolve_renders_inline_and_url_references() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let mut video = Video::new_draft(Uuid::new_v4(), "demo".to_string(), None);
    video.thumbnail = Some(MediaRef::inline("image/jpeg", b"jpegdata"));
    video.media = Some(MediaRef::url(
        "http://localhost:4000/assets/landscape/abc.mp4",
    ));

    let response = pipeline.resolve(video).await.unwrap();
    assert!(response
        .thumbnail_url
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(
        response.media_url.as_deref(),
        Some("http://localhost:4000/assets/landscape/abc.mp4")
    );
}

#[tokio::test]
async fn resolve_handles_missing_references() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let video = Video::new_draft(Uuid::new_v4(), "draft".to_string(), None);
    let response = pipeline.resolve(video).await.unwrap();
    assert!(response.thumbnail_url.is_none());
    assert!(response.media_url.is_none());
}

#[tokio::test]
async fn discard_removes_published_asset() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, assets) = pipeline_with(StorageMode::Local, toolchain).await;

    let asset = pipeline
        .publish_thumbnail("image/png", PNG_BYTES.to_vec())
        .await
        .unwrap();
    let key = asset.key.unwrap();
    assert!(assets.path().join(&key).is_file());

    pipeline.discard(&key).await;
    assert!(!assets.path().join(&key).exists());

    // Discarding a key that no longer exists must not panic.
    pipeline.discard(&key).await;
}

#[tokio::test]
async fn storage_health_probe_succeeds_on_live_backend() {
    let toolchain = Arc::new(FakeToolchain::with_dimensions(1920, 1080));
    let (pipeline, _assets) = pipeline_with(StorageMode::Local, toolchain).await;

    pipeline.storage_health_probe().await.unwrap();
}
