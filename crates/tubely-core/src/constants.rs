//! Shared constants for the ingestion pipeline.

/// Content type attached to every published video object.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension of published video objects and of the staged scratch file.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Prefix of the first scratch file: `<tag>-<random>.mp4`.
pub const SCRATCH_FILE_TAG: &str = "video";

/// Suffix appended to the staged path to name the remuxed output.
pub const OPTIMIZED_SUFFIX: &str = ".processing";

/// Random bytes in the unique segment of an object key (128 bits).
pub const OBJECT_KEY_RANDOM_BYTES: usize = 16;

/// Default upload ceiling in megabytes (1 GiB).
pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 1024;

/// Default timeout applied to each ffprobe/ffmpeg invocation.
pub const DEFAULT_MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;
