//! Storage backend setup

use anyhow::{Context, Result};
use reely_core::Config;
use reely_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the storage backend for the configured mode.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(mode = %config.storage_mode(), "Storage backend initialized");

    Ok(storage)
}
