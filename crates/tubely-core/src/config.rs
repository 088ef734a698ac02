//! Configuration module
//!
//! This module provides configuration structures for the ingestion pipeline,
//! including storage, scratch space and external media tool settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_VIDEO_SIZE_MB, DEFAULT_MEDIA_TOOL_TIMEOUT_SECS};
use crate::storage_types::StorageBackend;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub environment: String,
    pub service_name: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Pipeline configuration
    pub scratch_dir: PathBuf,
    pub max_video_size_bytes: u64,
    pub video_allowed_subtypes: Vec<String>,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    /// 0 disables the timeout
    pub media_tool_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_ingest().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn service_name(&self) -> &str {
        &self.as_ingest().base.service_name
    }

    pub fn log_json(&self) -> bool {
        self.as_ingest().base.log_format.eq_ignore_ascii_case("json")
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_ingest().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.as_ingest().scratch_dir
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.as_ingest().max_video_size_bytes
    }

    pub fn video_allowed_subtypes(&self) -> &[String] {
        &self.as_ingest().video_allowed_subtypes
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn media_tool_timeout(&self) -> Option<Duration> {
        match self.as_ingest().media_tool_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Read a numeric variable, falling back to `default` only when it is unset.
fn parse_u64_var(name: &str, default: u64) -> Result<u64, anyhow::Error> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

fn megabytes_to_bytes(megabytes: u64) -> Result<u64, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_VIDEO_SIZE_MB is too large"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?;

        let max_video_size_bytes = megabytes_to_bytes(parse_u64_var(
            "MAX_VIDEO_SIZE_MB",
            DEFAULT_MAX_VIDEO_SIZE_MB,
        )?)?;
        let media_tool_timeout_secs =
            parse_u64_var("MEDIA_TOOL_TIMEOUT_SECS", DEFAULT_MEDIA_TOOL_TIMEOUT_SECS)?;

        let config = IngestConfig {
            base: BaseConfig {
                environment,
                service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "tubely".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .to_lowercase(),
            },
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            scratch_dir: env::var("SCRATCH_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_video_size_bytes,
            video_allowed_subtypes: split_list(
                &env::var("VIDEO_ALLOWED_SUBTYPES").unwrap_or_else(|_| "mp4".to_string()),
            ),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            media_tool_timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than zero"));
        }

        if self.video_allowed_subtypes.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_SUBTYPES must contain at least one subtype"
            ));
        }

        if self.ffprobe_path.trim().is_empty() || self.ffmpeg_path.trim().is_empty() {
            return Err(anyhow::anyhow!("FFPROBE_PATH and FFMPEG_PATH must not be empty"));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
