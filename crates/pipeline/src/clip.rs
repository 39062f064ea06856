//! Single-clip pipeline
//!
//! One lossless (or ultrafast) transcode of the whole input, first and last
//! frame stills, and probe metadata. Runs entirely inside the caller's
//! workspace directory; nothing here touches the cache.

use crate::{Error, Result};
use bytes::Bytes;
use std::path::Path;
use tracing::info;
use vidpack_core::{ClipBundle, ClipOptions};
use vidpack_engine::{Engine, Profile};

fn read_artifact(path: &Path) -> Result<Bytes> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|e| Error::io(e, path, "read"))
}

/// Transcode `input` into a [`ClipBundle`], using `dir` for intermediates.
pub async fn run(
    engine: &Engine,
    input: &Path,
    dir: &Path,
    options: &ClipOptions,
) -> Result<ClipBundle> {
    let profile = Profile::select(options.ultrafast);
    let video = dir.join("video.webm");
    let first = dir.join("first.jpg");
    let last = dir.join("last.jpg");

    engine
        .transcode(input, &video, profile, options.speed)
        .await?;
    engine.first_frame(&video, &first).await?;
    engine.last_frame(&video, &last).await?;

    let num_frames = engine.frame_count(&video).await?;
    let dims = engine.dimensions(&video).await?;
    info!(
        num_frames,
        width = dims.width,
        height = dims.height,
        "clip transcoded"
    );

    Ok(ClipBundle {
        first_image: read_artifact(&first)?,
        last_image: read_artifact(&last)?,
        video: read_artifact(&video)?,
        num_frames,
        width: dims.width,
        height: dims.height,
    })
}
