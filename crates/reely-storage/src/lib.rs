//! Reely Storage Library
//!
//! This crate provides the storage abstraction and implementations for Reely.
//! It includes the Storage trait and implementations for S3 and the local
//! filesystem publisher.
//!
//! # Storage key format
//!
//! Video keys carry an aspect-ratio prefix (`landscape/`, `portrait/`,
//! `other/`) followed by a random hex filename; thumbnail keys are bare
//! random hex filenames. Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reely_core::StorageMode;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
