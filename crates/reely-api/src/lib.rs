//! Reely API Library
//!
//! This crate provides the HTTP API handlers, auth middleware, the upload
//! pipeline, and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod pipeline;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use pipeline::{PublishedAsset, UploadPipeline};
pub use state::AppState;
