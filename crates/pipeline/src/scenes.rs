//! Multi-scene pipeline
//!
//! Splits the input into validated, contiguous time ranges and transcodes
//! each one sequentially. The first-frame still and the dimensions come from
//! the original input (the poster frame), not from any scene output; each
//! scene contributes its own video, last-frame still, frame count, and
//! duration read back from the engine's progress log.

use crate::{Error, Result};
use bytes::Bytes;
use std::path::Path;
use tracing::{debug, info};
use vidpack_core::{Scene, SceneBounds, SceneSet};
use vidpack_engine::{Engine, Profile, scene_duration};

fn read_artifact(path: &Path) -> Result<Bytes> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|e| Error::io(e, path, "read"))
}

/// Transcode `input` into a [`SceneSet`] following pre-validated `bounds`.
pub async fn run(
    engine: &Engine,
    input: &Path,
    dir: &Path,
    bounds: &[SceneBounds],
    profile: Profile,
) -> Result<SceneSet> {
    let first = dir.join("first.jpg");
    engine.first_frame(input, &first).await?;
    let dims = engine.dimensions(input).await?;

    let mut scenes = Vec::with_capacity(bounds.len());
    for (i, range) in bounds.iter().enumerate() {
        let video = dir.join(format!("scene-{i}.webm"));
        let last = dir.join(format!("scene-{i}-last.jpg"));

        let out = engine
            .transcode_range(input, &video, profile, range.speed, range.start, range.end)
            .await?;
        let duration = scene_duration(&out.stderr)?;
        engine.last_frame(&video, &last).await?;
        let num_frames = engine.frame_count(&video).await?;
        debug!(scene = i, num_frames, duration, "scene transcoded");

        scenes.push(Scene {
            video: read_artifact(&video)?,
            last_image: read_artifact(&last)?,
            num_frames,
            duration,
        });
    }

    info!(
        scene_count = scenes.len(),
        width = dims.width,
        height = dims.height,
        "scene set transcoded"
    );

    Ok(SceneSet {
        first_image: read_artifact(&first)?,
        width: dims.width,
        height: dims.height,
        scenes,
    })
}
