//! Application setup and initialization
//!
//! All startup wiring lives here rather than in main.rs: configuration
//! validation, telemetry, database, storage, the upload pipeline, routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::pipeline::UploadPipeline;
use crate::state::AppState;
use anyhow::{Context, Result};
use reely_core::Config;
use reely_db::VideoRepository;
use reely_media::FfmpegToolchain;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(AppState, axum::Router)> {
    // Fail fast on misconfiguration, before anything connects.
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config);

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let toolchain = Arc::new(FfmpegToolchain::new(
        config.ffmpeg_path(),
        config.ffprobe_path(),
        Duration::from_secs(config.tool_timeout_secs()),
    ));
    let pipeline = UploadPipeline::new(storage, toolchain, &config);

    let state = AppState {
        videos: VideoRepository::new(pool.clone()),
        pool,
        pipeline,
        config,
    };

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
