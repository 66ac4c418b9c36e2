//! Reely Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all Reely components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AspectRatio, CreateVideoRequest, MediaRef, StorageMode, Video, VideoResponse};
