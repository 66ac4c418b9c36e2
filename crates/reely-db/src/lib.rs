//! Reely Database Library
//!
//! This crate provides the repository layer over Postgres. Repositories
//! return clean domain models; row shapes and JSONB decoding stay inside
//! this crate.

pub mod db;

// Re-export commonly used types
pub use db::VideoRepository;
