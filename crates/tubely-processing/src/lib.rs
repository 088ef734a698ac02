//! Tubely Video Processing Library
//!
//! This crate provides the video ingestion pipeline: format validation, staging of
//! the upload to scratch storage, probing with ffprobe, faststart remuxing with
//! ffmpeg and publishing the optimized file to object storage.

pub mod error;
pub mod pipeline;
pub mod probe;
pub mod publisher;
pub mod runner;
pub mod scratch;
pub mod validator;

// Re-export commonly used types
pub use error::PipelineError;
pub use pipeline::{PipelineStage, UploadRequest, VideoIngestPipeline};
pub use probe::parse_probe_output;
pub use publisher::ObjectPublisher;
pub use runner::{FfmpegToolRunner, MediaToolRunner};
pub use scratch::{ScratchFile, TempStager};
pub use validator::{FormatValidator, ValidationError};
