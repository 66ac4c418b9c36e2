//! Upload validation for size caps and content-type allow-lists.

use crate::types::{parse_media_type, THUMBNAIL_CONTENT_TYPES, VIDEO_CONTENT_TYPES};
use reely_core::AppError;

/// Common validation errors for uploaded media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Upload validator
///
/// Provides size and content-type validation for one upload kind without
/// coupling to storage implementation details.
#[derive(Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validator for thumbnail image uploads.
    pub fn for_thumbnails(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            THUMBNAIL_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Validator for video uploads.
    pub fn for_videos(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            VIDEO_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate a declared content type against the allow-list.
    ///
    /// Parameters are parsed off before comparison, so
    /// `image/png; charset=utf-8` passes when `image/png` is allowed.
    /// Returns the normalized media type for downstream use.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, ValidationError> {
        let normalized = parse_media_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }

    /// Validate size and content type together.
    pub fn validate(&self, content_type: &str, size: usize) -> Result<String, ValidationError> {
        self.validate_file_size(size)?;
        self.validate_content_type(content_type)
    }
}
