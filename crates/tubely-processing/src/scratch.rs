//! Scratch files for a single pipeline invocation.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tubely_core::constants::{SCRATCH_FILE_TAG, VIDEO_EXTENSION};
use tubely_core::Config;
use tubely_storage::ByteReader;

/// A scratch file path that is deleted when the guard is dropped.
///
/// The guard may be created before the file exists (for tool outputs); deleting a
/// file that was never written is not an error.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    /// Take ownership of `path`, scheduling its removal.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copies an upload body into a uniquely named scratch file.
#[derive(Debug, Clone)]
pub struct TempStager {
    scratch_dir: PathBuf,
    max_bytes: u64,
}

impl TempStager {
    pub fn new(scratch_dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scratch_dir().clone(), config.max_video_size_bytes())
    }

    /// Stage `body` to `<scratch_dir>/video-<random>.mp4`.
    ///
    /// The returned file is complete and can be reopened from offset 0. On any error
    /// the partially written file is removed before returning.
    pub async fn stage(&self, body: ByteReader) -> Result<ScratchFile, PipelineError> {
        let start = std::time::Instant::now();

        let (file, path) = tempfile::Builder::new()
            .prefix(&format!("{}-", SCRATCH_FILE_TAG))
            .suffix(&format!(".{}", VIDEO_EXTENSION))
            .tempfile_in(&self.scratch_dir)
            .map_err(PipelineError::StagingFailed)?
            .into_parts();
        let scratch = ScratchFile { path };

        let mut file = tokio::fs::File::from_std(file);
        let mut limited = body.take(self.max_bytes.saturating_add(1));

        let copied = tokio::io::copy(&mut limited, &mut file)
            .await
            .map_err(PipelineError::StagingFailed)?;

        if copied > self.max_bytes {
            return Err(PipelineError::PayloadTooLarge {
                max_bytes: self.max_bytes,
            });
        }

        file.flush().await.map_err(PipelineError::StagingFailed)?;
        file.sync_all().await.map_err(PipelineError::StagingFailed)?;

        tracing::info!(
            path = %scratch.path().display(),
            size_bytes = copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(scratch)
    }
}
