//! External media tools (ffprobe / ffmpeg).

use crate::error::PipelineError;
use crate::probe::parse_probe_output;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tubely_core::{Config, StreamGeometry};

/// Capability interface over the external probe and remux tools.
#[async_trait]
pub trait MediaToolRunner: Send + Sync {
    /// Read the geometry of the first video stream of `input`.
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, PipelineError>;

    /// Remux `input` into `output` with the index moved to the front of the file.
    ///
    /// Streams are copied without re-encoding. Success means `output` exists and is
    /// non-empty.
    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), PipelineError>;
}

/// Validate that a path doesn't contain shell metacharacters or dangerous sequences
fn validate_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(anyhow!("Path is empty"));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// `ffprobe -v error -print_format json -show_streams <input>`
fn probe_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-print_format", "json", "-show_streams"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args
}

/// `ffmpeg -nostdin -y -i <input> -c copy -movflags faststart -f mp4 <output>`
fn remux_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-nostdin".into(), "-y".into(), "-i".into()];
    args.push(input.as_os_str().to_owned());
    args.extend(
        ["-c", "copy", "-movflags", "faststart", "-f", "mp4"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// stdout followed by stderr, lossily decoded.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !text.is_empty() && !stderr.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&stderr);
    text
}

/// [`MediaToolRunner`] backed by the ffprobe and ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct FfmpegToolRunner {
    ffprobe_path: String,
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FfmpegToolRunner {
    pub fn new(ffprobe_path: String, ffmpeg_path: String, timeout: Option<Duration>) -> Result<Self> {
        validate_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        validate_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;

        Ok(Self {
            ffprobe_path,
            ffmpeg_path,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.ffprobe_path().to_string(),
            config.ffmpeg_path().to_string(),
            config.media_tool_timeout(),
        )
    }

    /// Run a tool to completion, killing it if the timeout elapses.
    async fn run(&self, program: &str, args: Vec<OsString>) -> Result<Output, String> {
        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| format!("{} timed out after {:?}", program, limit))?,
            None => command.output().await,
        };

        output.map_err(|e| format!("Failed to execute {}: {}", program, e))
    }
}

#[async_trait]
impl MediaToolRunner for FfmpegToolRunner {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, PipelineError> {
        let start = std::time::Instant::now();

        let output = self
            .run(&self.ffprobe_path, probe_args(input))
            .await
            .map_err(PipelineError::ProbeExecutionFailed)?;

        if !output.status.success() {
            return Err(PipelineError::ProbeExecutionFailed(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            width = geometry.width(),
            height = geometry.height(),
            "Video probe completed"
        );

        Ok(geometry)
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart_remux"
    ))]
    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        let start = std::time::Instant::now();

        let result = self
            .run(&self.ffmpeg_path, remux_args(input, output))
            .await
            .map_err(|reason| PipelineError::RemuxFailed {
                reason,
                diagnostics: String::new(),
            })?;

        if !result.status.success() {
            return Err(PipelineError::RemuxFailed {
                reason: format!("ffmpeg exited with {}", result.status),
                diagnostics: combined_output(&result),
            });
        }

        let size = match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => meta.len(),
            _ => {
                return Err(PipelineError::RemuxFailed {
                    reason: "ffmpeg produced no output file".to_string(),
                    diagnostics: combined_output(&result),
                })
            }
        };

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            size_bytes = size,
            "Faststart remux completed"
        );

        Ok(())
    }
}
