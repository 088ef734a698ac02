//! Video ingestion pipeline
//!
//! Sequences one upload through validate → stage → probe → remux → publish. Stages run
//! strictly in order, each reading the file produced by the previous one. Scratch
//! files are held by [`ScratchFile`] guards owned by the invocation, so every file
//! created is removed exactly once however the invocation ends.

use crate::error::PipelineError;
use crate::publisher::ObjectPublisher;
use crate::runner::MediaToolRunner;
use crate::scratch::{ScratchFile, TempStager};
use crate::validator::FormatValidator;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tubely_core::constants::OPTIMIZED_SUFFIX;
use tubely_core::{Config, ErrorMetadata, LogLevel, PublishedArtifact};
use tubely_storage::{ByteReader, Storage};
use uuid::Uuid;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validating,
    Staged,
    Probed,
    Optimized,
    Published,
    Done,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Staged => "staged",
            PipelineStage::Probed => "probed",
            PipelineStage::Optimized => "optimized",
            PipelineStage::Published => "published",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// One authenticated upload.
pub struct UploadRequest {
    pub owner_id: Uuid,
    pub video_id: Uuid,
    /// Client-declared `type/subtype`.
    pub declared_media_type: String,
    /// Read once, never rewound.
    pub body: ByteReader,
}

/// Path of the remux output for a staged file: `<staged>.processing`.
pub fn optimized_path(staged: &Path) -> PathBuf {
    let mut name = OsString::from(staged.as_os_str());
    name.push(OPTIMIZED_SUFFIX);
    PathBuf::from(name)
}

#[derive(Clone)]
pub struct VideoIngestPipeline {
    validator: FormatValidator,
    stager: TempStager,
    tools: Arc<dyn MediaToolRunner>,
    publisher: ObjectPublisher,
}

impl VideoIngestPipeline {
    pub fn new(
        validator: FormatValidator,
        stager: TempStager,
        tools: Arc<dyn MediaToolRunner>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            validator,
            stager,
            tools,
            publisher: ObjectPublisher::new(storage),
        }
    }

    pub fn from_config(
        config: &Config,
        tools: Arc<dyn MediaToolRunner>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(
            FormatValidator::from_config(config),
            TempStager::from_config(config),
            tools,
            storage,
        )
    }

    /// Run one upload through the pipeline.
    ///
    /// Returns the published artifact, or the error of the stage that failed. No
    /// scratch file created by this call survives it.
    #[tracing::instrument(skip_all, fields(
        owner_id = %request.owner_id,
        video_id = %request.video_id,
        media_type = %request.declared_media_type
    ))]
    pub async fn ingest(&self, request: UploadRequest) -> Result<PublishedArtifact, PipelineError> {
        let start = std::time::Instant::now();
        let result = self.run(request).await;

        match &result {
            Ok(artifact) => tracing::info!(
                stage = %PipelineStage::Done,
                key = %artifact.object_key,
                url = %artifact.url,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Video ingested"
            ),
            Err(e) => match e.log_level() {
                LogLevel::Debug => {
                    tracing::debug!(stage = %e.stage(), error = %e, "Video ingest rejected")
                }
                LogLevel::Warn => {
                    tracing::warn!(stage = %e.stage(), error = %e, "Video ingest failed")
                }
                LogLevel::Error => {
                    tracing::error!(stage = %e.stage(), error = %e, "Video ingest failed")
                }
            },
        }

        result
    }

    async fn run(&self, request: UploadRequest) -> Result<PublishedArtifact, PipelineError> {
        self.validator
            .accepted_extension(&request.declared_media_type)?;

        let staged = self.stager.stage(request.body).await?;

        let geometry = self.tools.probe(staged.path()).await?;
        let orientation = geometry.orientation();
        tracing::debug!(geometry = %geometry, orientation = %orientation, "Video probed");

        // Guard the output before the tool runs so partial output is also removed.
        let optimized = ScratchFile::adopt(optimized_path(staged.path()));
        self.tools.optimize(staged.path(), optimized.path()).await?;

        self.publisher.publish(optimized.path(), orientation).await
    }
}
