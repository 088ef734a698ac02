//! Pipeline errors
//!
//! One variant per failure kind of the ingestion pipeline. Each variant knows how it
//! should be presented to the calling layer through [`ErrorMetadata`].

use crate::pipeline::PipelineStage;
use crate::validator::ValidationError;
use tubely_core::{ErrorMetadata, LogLevel};
use tubely_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid media type: {0}")]
    InvalidMediaType(#[from] ValidationError),

    #[error("Upload exceeds the maximum size of {max_bytes} bytes")]
    PayloadTooLarge { max_bytes: u64 },

    #[error("Failed to stage upload: {0}")]
    StagingFailed(#[source] std::io::Error),

    #[error("ffprobe failed: {0}")]
    ProbeExecutionFailed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParseFailed(String),

    #[error("ffprobe reported no streams")]
    NoStreamsFound,

    #[error("Remux failed: {reason}\n{diagnostics}")]
    RemuxFailed { reason: String, diagnostics: String },

    #[error("Failed to publish video: {0}")]
    PublishFailed(#[source] StorageError),
}

impl PipelineError {
    /// Stage in which the pipeline failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::InvalidMediaType(_) => PipelineStage::Validating,
            PipelineError::PayloadTooLarge { .. } | PipelineError::StagingFailed(_) => {
                PipelineStage::Staged
            }
            PipelineError::ProbeExecutionFailed(_)
            | PipelineError::ProbeParseFailed(_)
            | PipelineError::NoStreamsFound => PipelineStage::Probed,
            PipelineError::RemuxFailed { .. } => PipelineStage::Optimized,
            PipelineError::PublishFailed(_) => PipelineStage::Published,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn pipeline_error_static_metadata(
    err: &PipelineError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        PipelineError::InvalidMediaType(_) => (
            400,
            "INVALID_MEDIA_TYPE",
            false,
            Some("Upload the video as video/mp4"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::PayloadTooLarge { .. } => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::StagingFailed(_) => (500, "STAGING_FAILED", true, None, true, LogLevel::Error),
        PipelineError::ProbeExecutionFailed(_) => (
            422,
            "PROBE_FAILED",
            false,
            Some("Check that the file is a complete, valid MP4"),
            false,
            LogLevel::Warn,
        ),
        PipelineError::ProbeParseFailed(_) => (
            422,
            "PROBE_PARSE_FAILED",
            false,
            Some("Check that the file is a complete, valid MP4"),
            false,
            LogLevel::Warn,
        ),
        PipelineError::NoStreamsFound => (
            422,
            "NO_STREAMS_FOUND",
            false,
            Some("Upload a file that contains a video stream"),
            false,
            LogLevel::Warn,
        ),
        PipelineError::RemuxFailed { .. } => (
            422,
            "REMUX_FAILED",
            false,
            Some("Check that the file is a complete, valid MP4"),
            false,
            LogLevel::Warn,
        ),
        PipelineError::PublishFailed(_) => (
            502,
            "PUBLISH_FAILED",
            true,
            Some("Retry the upload after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for PipelineError {
    fn http_status_code(&self) -> u16 {
        pipeline_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        pipeline_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        pipeline_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        pipeline_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            PipelineError::InvalidMediaType(e) => format!("Invalid video format: {}", e),
            PipelineError::PayloadTooLarge { max_bytes } => format!(
                "File size exceeds maximum allowed size of {} MB",
                max_bytes / 1024 / 1024
            ),
            PipelineError::StagingFailed(_) => "Failed to store the upload".to_string(),
            PipelineError::ProbeExecutionFailed(_) | PipelineError::ProbeParseFailed(_) => {
                "Could not read video metadata".to_string()
            }
            PipelineError::NoStreamsFound => "Video contains no streams".to_string(),
            PipelineError::RemuxFailed { .. } => "Video could not be processed".to_string(),
            PipelineError::PublishFailed(_) => "Failed to upload the video".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        pipeline_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        pipeline_error_static_metadata(self).5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorResponse;

    #[test]
    fn test_invalid_media_type_is_client_error() {
        let err = PipelineError::from(ValidationError::MalformedMediaType("mp4".to_string()));
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_MEDIA_TYPE");
        assert_eq!(err.stage(), PipelineStage::Validating);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_remux_diagnostics_in_details_only() {
        let err = PipelineError::RemuxFailed {
            reason: "ffmpeg exited with exit status: 1".to_string(),
            diagnostics: "moov atom not found".to_string(),
        };
        let response = ErrorResponse::from_error(&err, false);

        assert_eq!(response.status, 422);
        assert_eq!(response.code, "REMUX_FAILED");
        assert!(!response.error.contains("moov"));
        assert!(response
            .details
            .as_deref()
            .is_some_and(|d| d.contains("moov atom not found")));
    }

    #[test]
    fn test_publish_failure_is_recoverable_and_hidden() {
        let err = PipelineError::PublishFailed(StorageError::UploadFailed(
            "connection reset by s3.internal".to_string(),
        ));
        let response = ErrorResponse::from_error(&err, false);

        assert_eq!(response.status, 502);
        assert!(response.recoverable);
        assert_eq!(response.details, None);
        assert_eq!(err.stage(), PipelineStage::Published);
    }

    #[test]
    fn test_stage_tags() {
        assert_eq!(
            PipelineError::PayloadTooLarge { max_bytes: 1 }.stage(),
            PipelineStage::Staged
        );
        assert_eq!(PipelineError::NoStreamsFound.stage(), PipelineStage::Probed);
        assert_eq!(
            PipelineError::ProbeParseFailed("eof".to_string()).stage(),
            PipelineStage::Probed
        );
    }
}
