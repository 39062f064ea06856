//! In-memory artifact bundles
//!
//! A bundle is the decoded representation of one cache entry's payload:
//! exactly what the transcode pipeline produced on a miss and what the
//! archive codec reads back on a hit. Binary payloads use [`Bytes`] so the
//! publisher can hand them to the host build tool without copying.

use bytes::Bytes;

/// Artifact set produced by the single-clip pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipBundle {
    /// First frame of the transcoded video, JPEG.
    pub first_image: Bytes,
    /// Last frame of the transcoded video, JPEG.
    pub last_image: Bytes,
    /// The transcoded VP9/WebM video.
    pub video: Bytes,
    /// Total frame count of the transcoded video.
    pub num_frames: u64,
    /// Pixel width of the transcoded video.
    pub width: u32,
    /// Pixel height of the transcoded video.
    pub height: u32,
}

/// Artifact set produced by the multi-scene pipeline.
///
/// `scenes` ordering matches the caller-declared boundaries and must
/// round-trip exactly through archival.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSet {
    /// First frame of the original input, JPEG.
    pub first_image: Bytes,
    /// Pixel width of the original input.
    pub width: u32,
    /// Pixel height of the original input.
    pub height: u32,
    /// Per-scene artifacts, in declared order.
    pub scenes: Vec<Scene>,
}

/// Artifacts for one contiguous time range of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// The transcoded scene video, VP9/WebM.
    pub video: Bytes,
    /// Last frame of the scene video, JPEG.
    pub last_image: Bytes,
    /// Frame count of the scene video.
    pub num_frames: u64,
    /// Scene duration in seconds, from the engine's progress output.
    pub duration: f64,
}
