//! Transcoding and frame extraction
//!
//! All outputs are VP9/WebM with audio stripped. The ultrafast profile
//! trades quality for encode speed (realtime deadline, aggressive CRF,
//! downscale to 320px wide); the default profile is lossless.

use crate::command::Engine;
use crate::{EngineOutput, Result};
use std::path::Path;

/// Encode profile for a transcode invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// `-lossless 1`; slow, exact.
    Lossless,
    /// Realtime deadline, high CRF, 320px downscale; for fast dev builds.
    Ultrafast,
}

impl Profile {
    /// Select a profile from the caller's presence-flag.
    #[must_use]
    pub const fn select(ultrafast: bool) -> Self {
        if ultrafast {
            Self::Ultrafast
        } else {
            Self::Lossless
        }
    }
}

/// Video filter chain: optional range trim, optional downscale, and the
/// playback-speed scale, in that order.
///
/// The range is selected with a `trim` stage ahead of the speed `setpts`, so
/// its boundaries are timestamps of the *input*. Seek options after `-i`
/// would instead apply to post-filter timestamps, which the speed scale has
/// already rescaled, shifting every boundary by the speed factor.
///
/// The speed option scales presentation timestamps by `1/speed`, so a speed
/// of 2 halves the playback time.
fn filter_chain(profile: Profile, speed: f64, range: Option<(f64, Option<f64>)>) -> String {
    let mut stages = Vec::new();
    if let Some((start, end)) = range {
        stages.push(match end {
            Some(end) => format!("trim=start={start}:end={end}"),
            None => format!("trim=start={start}"),
        });
        stages.push("setpts=PTS-STARTPTS".to_string());
    }
    if profile == Profile::Ultrafast {
        stages.push("scale=320:-1".to_string());
    }
    stages.push(format!("setpts={}*PTS", 1.0 / speed));
    stages.join(",")
}

/// Build the ffmpeg argument vector for one transcode.
///
/// `range` restricts the output to `[start, end)` of the input; an unset end
/// means "to end of input".
fn transcode_args(
    input: &Path,
    output: &Path,
    profile: Profile,
    speed: f64,
    range: Option<(f64, Option<f64>)>,
) -> Vec<String> {
    let mut args = vec!["-i".to_string(), input.display().to_string()];
    args.push("-c:v".to_string());
    args.push("libvpx-vp9".to_string());
    match profile {
        Profile::Lossless => {
            args.push("-lossless".to_string());
            args.push("1".to_string());
        }
        Profile::Ultrafast => {
            for a in [
                "-deadline", "realtime", "-cpu-used", "8", "-crf", "63", "-b:v", "0", "-preset",
                "ultrafast", "-speed", "12",
            ] {
                args.push(a.to_string());
            }
        }
    }
    args.push("-an".to_string());
    args.push("-filter:v".to_string());
    args.push(filter_chain(profile, speed, range));
    args.push(output.display().to_string());
    args
}

impl Engine {
    /// Transcode the whole input to `output`.
    pub async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: Profile,
        speed: f64,
    ) -> Result<()> {
        self.ffmpeg(&transcode_args(input, output, profile, speed, None))
            .await?;
        Self::expect_output(output)
    }

    /// Transcode the `[start, end)` range of the input to `output`.
    ///
    /// Returns the captured engine output; its error stream carries the
    /// progress log used for duration extraction.
    pub async fn transcode_range(
        &self,
        input: &Path,
        output: &Path,
        profile: Profile,
        speed: f64,
        start: f64,
        end: Option<f64>,
    ) -> Result<EngineOutput> {
        let out = self
            .ffmpeg(&transcode_args(
                input,
                output,
                profile,
                speed,
                Some((start, end)),
            ))
            .await?;
        Self::expect_output(output)?;
        Ok(out)
    }

    /// Extract the first frame of `video` as a JPEG at `output`.
    pub async fn first_frame(&self, video: &Path, output: &Path) -> Result<()> {
        self.ffmpeg(&[
            "-i".to_string(),
            video.display().to_string(),
            "-vf".to_string(),
            "select=eq(n\\,0)".to_string(),
            "-q:v".to_string(),
            "1".to_string(),
            output.display().to_string(),
        ])
        .await?;
        Self::expect_output(output)
    }

    /// Extract the last frame of `video` as a JPEG at `output`.
    pub async fn last_frame(&self, video: &Path, output: &Path) -> Result<()> {
        self.ffmpeg(&[
            "-sseof".to_string(),
            "-1".to_string(),
            "-i".to_string(),
            video.display().to_string(),
            "-update".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "1".to_string(),
            output.display().to_string(),
        ])
        .await?;
        Self::expect_output(output)
    }
}
