//! Reely Media Library
//!
//! Media classification, probing, and processing for the upload pipeline.
//! The ffmpeg/ffprobe CLI tools are wrapped behind the `MediaToolchain`
//! trait so the pipeline can be exercised with a fake toolchain in tests.

pub mod error;
pub mod names;
pub mod probe;
pub mod toolchain;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{MediaError, MediaResult};
pub use names::random_hex_name;
pub use probe::{Dimensions, ProbeOutput, ProbeStream};
pub use toolchain::{FfmpegToolchain, MediaToolchain};
pub use types::{
    extension_for, parse_media_type, THUMBNAIL_CONTENT_TYPES, VIDEO_CONTENT_TYPES,
};
pub use validator::{UploadValidator, ValidationError};
