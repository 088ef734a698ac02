//! tubely-ingest: run one local video file through the ingest pipeline.
//!
//! Configuration comes from the environment (see `.env.example`). Prints the updated
//! video record as JSON on success, or the error response and exit status 1.

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_cli::{default_title, IngestOutcome};
use tubely_core::{Config, ErrorResponse, VideoRecord};
use tubely_infra::{init_from_config, shutdown_telemetry};
use tubely_processing::{FfmpegToolRunner, UploadRequest, VideoIngestPipeline};
use tubely_storage::create_storage;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tubely-ingest", about = "Optimize and publish a video file")]
struct Cli {
    /// Path to the video file
    file: PathBuf,
    /// Declared media type of the upload
    #[arg(long, default_value = "video/mp4")]
    content_type: String,
    /// Owner UUID (random if omitted)
    #[arg(long)]
    owner: Option<Uuid>,
    /// Video record UUID (random if omitted)
    #[arg(long)]
    video_id: Option<Uuid>,
    /// Video title (defaults to the file name)
    #[arg(long)]
    title: Option<String>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_from_config(&config).map_err(|e| anyhow!("Failed to initialize telemetry: {}", e))?;

    let storage = create_storage(&config)
        .await
        .context("Failed to create storage backend")?;
    let tools = FfmpegToolRunner::from_config(&config).context("Invalid media tool configuration")?;
    let pipeline = VideoIngestPipeline::from_config(&config, Arc::new(tools), storage);

    let owner_id = cli.owner.unwrap_or_else(Uuid::new_v4);
    let title = cli.title.unwrap_or_else(|| default_title(&cli.file));
    let video = VideoRecord::new(cli.video_id.unwrap_or_else(Uuid::new_v4), owner_id, title);

    let body = tokio::fs::File::open(&cli.file)
        .await
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;

    let request = UploadRequest {
        owner_id,
        video_id: video.id,
        declared_media_type: cli.content_type,
        body: Box::pin(body),
    };

    let result = pipeline.ingest(request).await;
    let succeeded = result.is_ok();

    match result {
        Ok(artifact) => print_json(&IngestOutcome::new(video, artifact))?,
        Err(e) => print_json(&ErrorResponse::from_error(&e, !config.is_production()))?,
    }

    shutdown_telemetry().await;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
