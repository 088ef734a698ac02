//! Tubely Storage Library
//!
//! This crate provides the object storage abstraction used to publish optimized
//! videos, with implementations for S3 (and S3-compatible providers) and the local
//! filesystem.
//!
//! # Object key format
//!
//! Published videos are stored under `<orientation>/<random>.mp4`, where `<random>`
//! is 16 random bytes encoded as unpadded URL-safe base64. Keys must not contain
//! `..` or a leading `/`. Key generation and validation live in the `keys` module so
//! all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
