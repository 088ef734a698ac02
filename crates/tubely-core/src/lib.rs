//! Tubely Core Library
//!
//! This crate provides the domain models, error metadata contract, configuration and
//! constants shared by the storage, processing and binary crates of the video
//! ingestion pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{ErrorMetadata, ErrorResponse, LogLevel};
pub use models::{GeometryError, Orientation, PublishedArtifact, StreamGeometry, VideoRecord};
pub use storage_types::StorageBackend;
