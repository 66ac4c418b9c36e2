//! Database repositories for data access layer
//!
//! Each repository owns a specific domain entity and provides CRUD
//! operations and specialized queries over the shared pool.

pub mod video;

pub use video::VideoRepository;
