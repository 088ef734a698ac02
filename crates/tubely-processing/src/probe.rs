//! ffprobe JSON output parsing.

use crate::error::PipelineError;
use serde::Deserialize;
use tubely_core::StreamGeometry;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
}

/// Only the fields the pipeline needs; everything else ffprobe reports is ignored.
#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Extract the geometry of the first video stream from `ffprobe -print_format json -show_streams`.
///
/// A stream counts as video when ffprobe tags it `codec_type: "video"` or, for
/// untagged output, when it carries both dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamGeometry, PipelineError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| PipelineError::ProbeParseFailed(e.to_string()))?;

    if output.streams.is_empty() {
        return Err(PipelineError::NoStreamsFound);
    }

    let stream = output
        .streams
        .iter()
        .find(|s| match s.codec_type.as_deref() {
            Some(kind) => kind == "video",
            None => s.width.is_some() && s.height.is_some(),
        })
        .ok_or_else(|| PipelineError::ProbeParseFailed("no video stream reported".to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(PipelineError::ProbeParseFailed(
                "video stream has no width/height".to_string(),
            ))
        }
    };

    StreamGeometry::new(width, height).map_err(|e| PipelineError::ProbeParseFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::Orientation;

    #[test]
    fn test_parses_real_ffprobe_output() {
        let json = br#"{
            "streams": [
                {
                    "index": 0,
                    "codec_name": "h264",
                    "codec_type": "video",
                    "width": 1280,
                    "height": 720,
                    "r_frame_rate": "30/1"
                },
                {
                    "index": 1,
                    "codec_name": "aac",
                    "codec_type": "audio",
                    "sample_rate": "48000"
                }
            ]
        }"#;

        let geometry = parse_probe_output(json).unwrap();
        assert_eq!((geometry.width(), geometry.height()), (1280, 720));
        assert_eq!(geometry.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_skips_leading_audio_stream() {
        let json = br#"{"streams":[
            {"codec_type":"audio"},
            {"codec_type":"video","width":1080,"height":1920}
        ]}"#;
        let geometry = parse_probe_output(json).unwrap();
        assert_eq!(geometry.orientation(), Orientation::Portrait);
    }

    #[test]
    fn test_untagged_stream_with_dimensions() {
        let geometry = parse_probe_output(br#"{"streams":[{"width":1000,"height":1000}]}"#).unwrap();
        assert_eq!(geometry.orientation(), Orientation::Other);
    }

    #[test]
    fn test_empty_streams_is_no_streams_found() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[]}"#),
            Err(PipelineError::NoStreamsFound)
        ));
    }

    #[test]
    fn test_garbage_is_parse_failure() {
        assert!(matches!(
            parse_probe_output(b""),
            Err(PipelineError::ProbeParseFailed(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"format":{}}"#),
            Err(PipelineError::ProbeParseFailed(_))
        ));
    }

    #[test]
    fn test_zero_height_is_rejected() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[{"codec_type":"video","width":640,"height":0}]}"#),
            Err(PipelineError::ProbeParseFailed(_))
        ));
    }

    #[test]
    fn test_audio_only_is_parse_failure() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[{"codec_type":"audio"}]}"#),
            Err(PipelineError::ProbeParseFailed(_))
        ));
    }
}
