//! Public assets route for locally published files.
//!
//! Serves files under the configured assets root. Keys may carry an
//! aspect-ratio prefix (`landscape/abc.mp4`), so the route takes a
//! wildcard path; every request is canonicalized and checked against the
//! root before a byte is read.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use reely_core::AppError;
use std::path::{Component, Path as FsPath};
use tokio_util::io::ReaderStream;

/// Reject path segments that could escape the assets root.
fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return false;
    }
    FsPath::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

fn content_type_for(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[tracing::instrument(skip(state), fields(operation = "get_asset"))]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, HttpAppError> {
    let root = state
        .config
        .assets_root()
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

    if !is_safe_relative_path(&path) {
        return Err(HttpAppError::from(AppError::NotFound(
            "Asset not found".to_string(),
        )));
    }

    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|e| AppError::Internal(format!("Assets root unavailable: {}", e)))?;
    let candidate = match tokio::fs::canonicalize(root.join(&path)).await {
        Ok(p) => p,
        Err(_) => {
            return Err(HttpAppError::from(AppError::NotFound(
                "Asset not found".to_string(),
            )))
        }
    };
    if !candidate.starts_with(&root) {
        return Err(HttpAppError::from(AppError::NotFound(
            "Asset not found".to_string(),
        )));
    }

    let file = tokio::fs::File::open(&candidate)
        .await
        .map_err(|_| AppError::NotFound("Asset not found".to_string()))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to stat asset: {}", e)))?
        .len();

    let stream = ReaderStream::new(file);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&candidate))
        .header(header::CONTENT_LENGTH, len)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_paths_accepted() {
        assert!(is_safe_relative_path("abc123.png"));
        assert!(is_safe_relative_path("landscape/abc123.mp4"));
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(!is_safe_relative_path(""));
        assert!(!is_safe_relative_path("../etc/passwd"));
        assert!(!is_safe_relative_path("landscape/../../etc/passwd"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("..\\windows"));
        assert!(!is_safe_relative_path("./abc.png"));
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for(FsPath::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(FsPath::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(FsPath::new("a.png")), "image/png");
        assert_eq!(content_type_for(FsPath::new("dir/a.mp4")), "video/mp4");
        assert_eq!(
            content_type_for(FsPath::new("a.bin")),
            "application/octet-stream"
        );
    }
}
