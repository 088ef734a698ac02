use crate::error::PipelineError;
use std::path::Path;
use std::sync::Arc;
use tubely_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_EXTENSION};
use tubely_core::{Orientation, PublishedArtifact};
use tubely_storage::{generate_object_key, Storage, StorageError};

/// Streams an optimized video into object storage under an orientation-prefixed key.
#[derive(Clone)]
pub struct ObjectPublisher {
    storage: Arc<dyn Storage>,
}

impl ObjectPublisher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Upload `file` as `<orientation>/<random>.mp4`. No retries.
    pub async fn publish(
        &self,
        file: &Path,
        orientation: Orientation,
    ) -> Result<PublishedArtifact, PipelineError> {
        let object_key = generate_object_key(orientation.as_str(), VIDEO_EXTENSION);

        // Fresh handle so the read starts at offset 0.
        let source = tokio::fs::File::open(file)
            .await
            .map_err(|e| PipelineError::PublishFailed(StorageError::IoError(e)))?;
        let content_length = source
            .metadata()
            .await
            .map_err(|e| PipelineError::PublishFailed(StorageError::IoError(e)))?
            .len();

        let url = self
            .storage
            .upload_stream(
                &object_key,
                VIDEO_CONTENT_TYPE,
                Some(content_length),
                Box::pin(source),
            )
            .await
            .map_err(PipelineError::PublishFailed)?;

        tracing::info!(
            key = %object_key,
            orientation = %orientation,
            backend = %self.storage.backend_type(),
            size_bytes = content_length,
            "Video published"
        );

        Ok(PublishedArtifact {
            object_key,
            url,
            orientation,
        })
    }
}
