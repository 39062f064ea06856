//! Stream probing (frame counts, dimensions, engine version)

use crate::command::Engine;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<Dimensions>,
}

fn parse_frame_count(stdout: &str) -> Result<u64> {
    stdout
        .trim()
        .parse()
        .map_err(|_| Error::probe("frame count", format!("unexpected output {:?}", stdout.trim())))
}

fn parse_dimensions(json: &str) -> Result<Dimensions> {
    let report: ProbeReport =
        serde_json::from_str(json).map_err(|e| Error::probe("dimensions", e.to_string()))?;
    report
        .streams
        .first()
        .copied()
        .ok_or_else(|| Error::probe("dimensions", "no video stream in probe report"))
}

impl Engine {
    /// The engine's full version banner, used for the toolchain identity.
    pub async fn version(&self) -> Result<String> {
        let out = self.ffmpeg(&["-version".to_string()]).await?;
        Ok(out.stdout)
    }

    /// Count decoded frames of the first video stream.
    pub async fn frame_count(&self, video: &Path) -> Result<u64> {
        let out = self
            .ffprobe(&[
                "-v".to_string(),
                "error".to_string(),
                "-count_frames".to_string(),
                "-select_streams".to_string(),
                "v:0".to_string(),
                "-show_entries".to_string(),
                "stream=nb_read_frames".to_string(),
                "-of".to_string(),
                "default=nokey=1:noprint_wrappers=1".to_string(),
                video.display().to_string(),
            ])
            .await?;
        parse_frame_count(&out.stdout)
    }

    /// Pixel dimensions of the first video stream.
    pub async fn dimensions(&self, video: &Path) -> Result<Dimensions> {
        let out = self
            .ffprobe(&[
                "-v".to_string(),
                "error".to_string(),
                "-select_streams".to_string(),
                "v:0".to_string(),
                "-show_entries".to_string(),
                "stream=width,height".to_string(),
                "-of".to_string(),
                "json".to_string(),
                video.display().to_string(),
            ])
            .await?;
        parse_dimensions(&out.stdout)
    }
}
