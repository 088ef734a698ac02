//! Test doubles for pipeline integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;
use tubely_core::StreamGeometry;
use tubely_processing::{
    parse_probe_output, MediaToolRunner, PipelineError, UploadRequest, VideoIngestPipeline,
};
use tubely_processing::{FormatValidator, TempStager};
use tubely_storage::s3::build_object_url;
use tubely_storage::{ByteReader, Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

pub const TEST_BUCKET: &str = "tubely-test";
pub const TEST_REGION: &str = "us-east-2";

/// What the fake prober reports.
#[derive(Clone)]
pub enum ProbeBehavior {
    /// Raw ffprobe stdout, parsed by the real parser.
    Output(String),
    /// Tool exits non-zero.
    ExitFailure,
}

impl ProbeBehavior {
    pub fn geometry(width: u32, height: u32) -> Self {
        ProbeBehavior::Output(format!(
            r#"{{"streams":[{{"codec_type":"video","width":{},"height":{}}}]}}"#,
            width, height
        ))
    }

    pub fn raw(json: &str) -> Self {
        ProbeBehavior::Output(json.to_string())
    }
}

/// What the fake remuxer does.
#[derive(Clone)]
pub enum OptimizeBehavior {
    /// Copies input to output with a marker prefix.
    Succeed,
    /// Writes a truncated output, then fails.
    FailWithPartialOutput,
    /// Exits zero without writing anything.
    NoOutput,
}

pub const REMUX_MARKER: &[u8] = b"faststart:";

#[derive(Default)]
pub struct ToolCalls {
    pub probed: Vec<PathBuf>,
    pub optimized: Vec<(PathBuf, PathBuf)>,
}

/// [`MediaToolRunner`] that never spawns a process.
pub struct FakeToolRunner {
    probe: ProbeBehavior,
    optimize: OptimizeBehavior,
    pub calls: Mutex<ToolCalls>,
}

impl FakeToolRunner {
    pub fn new(probe: ProbeBehavior, optimize: OptimizeBehavior) -> Self {
        Self {
            probe,
            optimize,
            calls: Mutex::new(ToolCalls::default()),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.calls.lock().unwrap().probed.len()
    }

    pub fn optimize_count(&self) -> usize {
        self.calls.lock().unwrap().optimized.len()
    }
}

#[async_trait]
impl MediaToolRunner for FakeToolRunner {
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, PipelineError> {
        self.calls.lock().unwrap().probed.push(input.to_path_buf());
        assert!(input.exists(), "probe ran before staging finished");

        match &self.probe {
            ProbeBehavior::Output(json) => parse_probe_output(json.as_bytes()),
            ProbeBehavior::ExitFailure => Err(PipelineError::ProbeExecutionFailed(
                "exited with exit status: 1: moov atom not found".to_string(),
            )),
        }
    }

    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        self.calls
            .lock()
            .unwrap()
            .optimized
            .push((input.to_path_buf(), output.to_path_buf()));

        match self.optimize {
            OptimizeBehavior::Succeed => {
                let mut data = REMUX_MARKER.to_vec();
                data.extend(tokio::fs::read(input).await.unwrap());
                tokio::fs::write(output, data).await.unwrap();
                Ok(())
            }
            OptimizeBehavior::FailWithPartialOutput => {
                tokio::fs::write(output, b"trunc").await.unwrap();
                Err(PipelineError::RemuxFailed {
                    reason: "ffmpeg exited with exit status: 1".to_string(),
                    diagnostics: "Invalid data found when processing input".to_string(),
                })
            }
            OptimizeBehavior::NoOutput => Err(PipelineError::RemuxFailed {
                reason: "ffmpeg produced no output file".to_string(),
                diagnostics: String::new(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub content_length: Option<u64>,
    pub data: Vec<u8>,
}

/// In-memory [`Storage`] that records every put.
#[derive(Default)]
pub struct RecordingStorage {
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub puts: Mutex<Vec<String>>,
    pub fail_uploads: bool,
}

impl RecordingStorage {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Default::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: ByteReader,
    ) -> StorageResult<String> {
        self.puts.lock().unwrap().push(storage_key.to_string());

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        if self.fail_uploads {
            return Err(StorageError::UploadFailed(
                "connection reset after partial body".to_string(),
            ));
        }

        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                content_length,
                data,
            },
        );
        Ok(self.public_url(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        build_object_url(TEST_BUCKET, TEST_REGION, None, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

pub struct Harness {
    pub scratch: tempfile::TempDir,
    pub tools: Arc<FakeToolRunner>,
    pub storage: Arc<RecordingStorage>,
    pub pipeline: VideoIngestPipeline,
}

impl Harness {
    pub fn new(probe: ProbeBehavior, optimize: OptimizeBehavior, storage: RecordingStorage) -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let tools = Arc::new(FakeToolRunner::new(probe, optimize));
        let storage = Arc::new(storage);
        let pipeline = VideoIngestPipeline::new(
            FormatValidator::video(),
            TempStager::new(scratch.path(), 1024 * 1024),
            tools.clone(),
            storage.clone(),
        );
        Self {
            scratch,
            tools,
            storage,
            pipeline,
        }
    }

    pub fn succeeding(width: u32, height: u32) -> Self {
        Self::new(
            ProbeBehavior::geometry(width, height),
            OptimizeBehavior::Succeed,
            RecordingStorage::default(),
        )
    }

    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.scratch.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

pub fn upload(media_type: &str, data: &[u8]) -> UploadRequest {
    UploadRequest {
        owner_id: Uuid::new_v4(),
        video_id: Uuid::new_v4(),
        declared_media_type: media_type.to_string(),
        body: Box::pin(Cursor::new(data.to_vec())),
    }
}
