//! Domain models

pub mod media;
pub mod video;

pub use media::{GeometryError, Orientation, PublishedArtifact, StreamGeometry};
pub use video::VideoRecord;
