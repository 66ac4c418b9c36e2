//! HTTP request handlers.

pub mod assets;
pub mod thumbnail_upload;
pub mod video_create;
pub mod video_get;
pub mod video_upload;
