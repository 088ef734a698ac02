//! Stream geometry and the orientation bucket derived from it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Landscape aspect ratio band (exclusive), around 16:9.
const LANDSCAPE_RATIO: (f64, f64) = (1.7, 1.8);
/// Portrait aspect ratio band (exclusive), around 9:16.
const PORTRAIT_RATIO: (f64, f64) = (0.5, 0.6);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid stream geometry {width}x{height}: dimensions must be positive")]
    ZeroDimension { width: u32, height: u32 },
}

/// Width and height of the first video stream of a file.
///
/// Both dimensions are guaranteed non-zero, so the aspect ratio is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamGeometry {
    width: u32,
    height: u32,
}

impl StreamGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::classify(self)
    }
}

impl Display for StreamGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Coarse orientation bucket, used only as the object key prefix.
///
/// Most ratios (4:3, 1:1, ultra-wide) land in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    pub fn classify(geometry: &StreamGeometry) -> Self {
        let ratio = geometry.aspect_ratio();
        if ratio > LANDSCAPE_RATIO.0 && ratio < LANDSCAPE_RATIO.1 {
            Orientation::Landscape
        } else if ratio > PORTRAIT_RATIO.0 && ratio < PORTRAIT_RATIO.1 {
            Orientation::Portrait
        } else {
            Orientation::Other
        }
    }

    /// Key prefix literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A video object that has been durably stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedArtifact {
    /// `<orientation>/<random>.mp4`
    pub object_key: String,
    pub url: String,
    pub orientation: Orientation,
}
