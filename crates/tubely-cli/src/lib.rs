use serde::Serialize;
use std::path::Path;
use tubely_core::{Orientation, PublishedArtifact, VideoRecord};

/// Success output of `tubely-ingest`.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub video: VideoRecord,
    pub object_key: String,
    pub orientation: Orientation,
}

impl IngestOutcome {
    /// Write the published URL back onto the record.
    pub fn new(mut video: VideoRecord, artifact: PublishedArtifact) -> Self {
        video.attach_video_url(artifact.url);
        Self {
            video,
            object_key: artifact.object_key,
            orientation: artifact.orientation,
        }
    }
}

/// Title for a record created from a local file: the file stem.
pub fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn default_title_uses_file_stem() {
        assert_eq!(default_title(Path::new("/videos/boots.mp4")), "boots");
        assert_eq!(default_title(Path::new("/")), "untitled");
    }

    #[test]
    fn outcome_attaches_url() {
        let owner = Uuid::new_v4();
        let video = VideoRecord::new(Uuid::new_v4(), owner, "boots");
        let outcome = IngestOutcome::new(
            video,
            PublishedArtifact {
                object_key: "landscape/abc.mp4".to_string(),
                url: "https://tubely-65365.s3.us-east-2.amazonaws.com/landscape/abc.mp4"
                    .to_string(),
                orientation: Orientation::Landscape,
            },
        );

        assert_eq!(
            outcome.video.video_url.as_deref(),
            Some("https://tubely-65365.s3.us-east-2.amazonaws.com/landscape/abc.mp4")
        );
        assert_eq!(outcome.video.user_id, owner);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["orientation"], "landscape");
        assert_eq!(json["object_key"], "landscape/abc.mp4");
    }
}
