//! Archive codec
//!
//! One cache entry is a single tar stream compressed with zstd. Entries are
//! streamed to the destination file during encode (video payloads can be
//! large) and streamed back out during decode.
//!
//! Clip layout:
//! ```text
//! first.jpg
//! last.jpg
//! video.webm
//! data.json          {"numFrames", "width", "height"}
//! ```
//!
//! Scene layout (manifest-driven: `sceneCount` in the top-level metadata is
//! authoritative, and the numeric scene folders must be exactly
//! `0..sceneCount`):
//! ```text
//! first.jpg
//! data.json          {"width", "height", "sceneCount"}
//! scenes/<i>/video.webm
//! scenes/<i>/last.jpg
//! scenes/<i>/data.json   {"numFrames", "duration"}
//! ```

use crate::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use vidpack_core::{ClipBundle, Scene, SceneSet};

const FIRST_IMAGE: &str = "first.jpg";
const LAST_IMAGE: &str = "last.jpg";
const VIDEO: &str = "video.webm";
const METADATA: &str = "data.json";
const SCENES_DIR: &str = "scenes";

const ZSTD_LEVEL: i32 = 3;

/// A bundle that can be written to and read from a cache archive.
///
/// `read_archive(write_archive(bundle))` is exact: byte-for-byte for binary
/// entries, structural for metadata.
pub trait ArchiveBundle: Sized {
    /// Serialize the bundle into a single archive file at `dest`.
    fn write_archive(&self, dest: &Path) -> Result<()>;
    /// Deserialize a bundle from the archive file at `src`.
    fn read_archive(src: &Path) -> Result<Self>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClipMeta {
    num_frames: u64,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneSetMeta {
    width: u32,
    height: u32,
    scene_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneMeta {
    num_frames: u64,
    duration: f64,
}

fn new_encoder(dest: &Path) -> Result<tar::Builder<zstd::Encoder<'static, File>>> {
    let file = File::create(dest).map_err(|e| Error::io(e, dest, "create"))?;
    let enc = zstd::Encoder::new(file, ZSTD_LEVEL)
        .map_err(|e| Error::archive(format!("zstd encoder error: {e}")))?;
    Ok(tar::Builder::new(enc))
}

fn finish_encoder(builder: tar::Builder<zstd::Encoder<'static, File>>) -> Result<()> {
    let enc = builder
        .into_inner()
        .map_err(|e| Error::archive(format!("tar finalize failed: {e}")))?;
    let mut file = enc
        .finish()
        .map_err(|e| Error::archive(format!("zstd finish failed: {e}")))?;
    file.flush().map_err(|e| Error::io_no_path(e, "flush"))?;
    Ok(())
}

fn append_entry<W: Write>(builder: &mut tar::Builder<W>, name: &str, data: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, name, data)
        .map_err(|e| Error::archive(format!("failed to append {name}: {e}")))
}

fn metadata_entry<T: Serialize, W: Write>(
    builder: &mut tar::Builder<W>,
    name: &str,
    meta: &T,
) -> Result<()> {
    let json = serde_json::to_vec(meta)
        .map_err(|e| Error::serialization(format!("failed to serialize {name}: {e}")))?;
    append_entry(builder, name, &json)
}

fn parse_metadata<T: for<'de> Deserialize<'de>>(name: &str, data: &[u8]) -> Result<T> {
    serde_json::from_slice(data)
        .map_err(|e| Error::serialization(format!("failed to parse {name}: {e}")))
}

/// Iterate archive entries as `(path, contents)` pairs.
fn for_each_entry(
    src: &Path,
    mut f: impl FnMut(&str, Vec<u8>) -> Result<()>,
) -> Result<()> {
    let file = File::open(src).map_err(|e| Error::io(e, src, "open"))?;
    let dec = zstd::Decoder::new(file)
        .map_err(|e| Error::archive(format!("zstd decoder error: {e}")))?;
    let mut archive = tar::Archive::new(dec);
    let entries = archive
        .entries()
        .map_err(|e| Error::archive(format!("failed to list entries: {e}")))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive(format!("bad entry: {e}")))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| Error::archive(format!("bad entry path: {e}")))?
            .to_string_lossy()
            .into_owned();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| Error::archive(format!("failed to read {path}: {e}")))?;
        f(&path, data)?;
    }
    Ok(())
}

fn missing(entry: &str) -> Error {
    Error::archive(format!("missing entry {entry}"))
}

impl ArchiveBundle for ClipBundle {
    fn write_archive(&self, dest: &Path) -> Result<()> {
        let mut builder = new_encoder(dest)?;
        append_entry(&mut builder, FIRST_IMAGE, &self.first_image)?;
        append_entry(&mut builder, LAST_IMAGE, &self.last_image)?;
        append_entry(&mut builder, VIDEO, &self.video)?;
        metadata_entry(
            &mut builder,
            METADATA,
            &ClipMeta {
                num_frames: self.num_frames,
                width: self.width,
                height: self.height,
            },
        )?;
        finish_encoder(builder)
    }

    fn read_archive(src: &Path) -> Result<Self> {
        let mut first_image = None;
        let mut last_image = None;
        let mut video = None;
        let mut meta: Option<ClipMeta> = None;

        for_each_entry(src, |path, data| {
            match path {
                FIRST_IMAGE => first_image = Some(Bytes::from(data)),
                LAST_IMAGE => last_image = Some(Bytes::from(data)),
                VIDEO => video = Some(Bytes::from(data)),
                METADATA => meta = Some(parse_metadata(METADATA, &data)?),
                other => tracing::warn!(entry = other, "ignoring unexpected archive entry"),
            }
            Ok(())
        })?;

        let meta = meta.ok_or_else(|| missing(METADATA))?;
        Ok(Self {
            first_image: first_image.ok_or_else(|| missing(FIRST_IMAGE))?,
            last_image: last_image.ok_or_else(|| missing(LAST_IMAGE))?,
            video: video.ok_or_else(|| missing(VIDEO))?,
            num_frames: meta.num_frames,
            width: meta.width,
            height: meta.height,
        })
    }
}

#[derive(Default)]
struct PartialScene {
    video: Option<Bytes>,
    last_image: Option<Bytes>,
    meta: Option<SceneMeta>,
}

/// Split `scenes/<i>/<name>` into its numeric index and entry name.
fn scene_entry(path: &str) -> Option<(usize, &str)> {
    let rest = path.strip_prefix(SCENES_DIR)?.strip_prefix('/')?;
    let (idx, name) = rest.split_once('/')?;
    Some((idx.parse().ok()?, name))
}

impl ArchiveBundle for SceneSet {
    fn write_archive(&self, dest: &Path) -> Result<()> {
        let mut builder = new_encoder(dest)?;
        append_entry(&mut builder, FIRST_IMAGE, &self.first_image)?;
        metadata_entry(
            &mut builder,
            METADATA,
            &SceneSetMeta {
                width: self.width,
                height: self.height,
                scene_count: self.scenes.len(),
            },
        )?;
        for (i, scene) in self.scenes.iter().enumerate() {
            append_entry(&mut builder, &format!("{SCENES_DIR}/{i}/{VIDEO}"), &scene.video)?;
            append_entry(
                &mut builder,
                &format!("{SCENES_DIR}/{i}/{LAST_IMAGE}"),
                &scene.last_image,
            )?;
            metadata_entry(
                &mut builder,
                &format!("{SCENES_DIR}/{i}/{METADATA}"),
                &SceneMeta {
                    num_frames: scene.num_frames,
                    duration: scene.duration,
                },
            )?;
        }
        finish_encoder(builder)
    }

    fn read_archive(src: &Path) -> Result<Self> {
        let mut first_image = None;
        let mut meta: Option<SceneSetMeta> = None;
        // Keyed by parsed numeric index, so 10 sorts after 9.
        let mut partials: BTreeMap<usize, PartialScene> = BTreeMap::new();

        for_each_entry(src, |path, data| {
            if let Some((idx, name)) = scene_entry(path) {
                let partial = partials.entry(idx).or_default();
                match name {
                    VIDEO => partial.video = Some(Bytes::from(data)),
                    LAST_IMAGE => partial.last_image = Some(Bytes::from(data)),
                    METADATA => partial.meta = Some(parse_metadata(path, &data)?),
                    other => {
                        tracing::warn!(entry = other, scene = idx, "ignoring unexpected scene entry");
                    }
                }
                return Ok(());
            }
            match path {
                FIRST_IMAGE => first_image = Some(Bytes::from(data)),
                METADATA => meta = Some(parse_metadata(METADATA, &data)?),
                other => tracing::warn!(entry = other, "ignoring unexpected archive entry"),
            }
            Ok(())
        })?;

        let meta = meta.ok_or_else(|| missing(METADATA))?;
        if partials.len() != meta.scene_count {
            return Err(Error::archive(format!(
                "expected {} scenes, found {}",
                meta.scene_count,
                partials.len()
            )));
        }

        let mut scenes = Vec::with_capacity(meta.scene_count);
        for (expected, (idx, partial)) in partials.into_iter().enumerate() {
            if idx != expected {
                return Err(Error::archive(format!(
                    "scene folders are not contiguous: expected {expected}, found {idx}"
                )));
            }
            let scene_meta = partial
                .meta
                .ok_or_else(|| missing(&format!("{SCENES_DIR}/{idx}/{METADATA}")))?;
            scenes.push(Scene {
                video: partial
                    .video
                    .ok_or_else(|| missing(&format!("{SCENES_DIR}/{idx}/{VIDEO}")))?,
                last_image: partial
                    .last_image
                    .ok_or_else(|| missing(&format!("{SCENES_DIR}/{idx}/{LAST_IMAGE}")))?,
                num_frames: scene_meta.num_frames,
                duration: scene_meta.duration,
            });
        }

        Ok(Self {
            first_image: first_image.ok_or_else(|| missing(FIRST_IMAGE))?,
            width: meta.width,
            height: meta.height,
            scenes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn clip_fixture() -> ClipBundle {
        ClipBundle {
            first_image: Bytes::from_static(&[0xff, 0xd8, 0x00, 0x01]),
            last_image: Bytes::from_static(&[0xff, 0xd8, 0x00, 0x02]),
            video: Bytes::from(vec![0x1a, 0x45, 0xdf, 0xa3, 0x00, 0x7f, 0xff]),
            num_frames: 48,
            width: 640,
            height: 360,
        }
    }

    fn scene_fixture(tag: u8) -> Scene {
        Scene {
            video: Bytes::from(vec![0x1a, 0x45, tag]),
            last_image: Bytes::from(vec![0xff, 0xd8, tag]),
            num_frames: u64::from(tag) * 10,
            duration: f64::from(tag) * 1.5,
        }
    }

    #[test]
    fn clip_round_trip_is_exact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");
        let bundle = clip_fixture();

        bundle.write_archive(&path).unwrap();
        let decoded = ClipBundle::read_archive(&path).unwrap();
        assert_eq!(decoded, bundle);
    }

    #[test]
    fn scene_round_trip_preserves_numeric_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");
        // 11 scenes so that folder "10" must sort after "9", not after "1".
        let set = SceneSet {
            first_image: Bytes::from_static(b"\xff\xd8first"),
            width: 1280,
            height: 720,
            scenes: (0..11).map(|i| scene_fixture(i as u8 + 1)).collect(),
        };

        set.write_archive(&path).unwrap();
        let decoded = SceneSet::read_archive(&path).unwrap();
        assert_eq!(decoded, set);
        assert_eq!(decoded.scenes.len(), 11);
        // Spot-check the tail: scene 10 carries tag 11.
        assert_eq!(decoded.scenes[10].num_frames, 110);
    }

    #[test]
    fn empty_scene_list_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");
        let set = SceneSet {
            first_image: Bytes::from_static(b"img"),
            width: 10,
            height: 10,
            scenes: vec![],
        };
        set.write_archive(&path).unwrap();
        let decoded = SceneSet::read_archive(&path).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn clip_archive_missing_entry_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");

        // Hand-build an archive missing video.webm.
        let mut builder = new_encoder(&path).unwrap();
        append_entry(&mut builder, FIRST_IMAGE, b"a").unwrap();
        append_entry(&mut builder, LAST_IMAGE, b"b").unwrap();
        metadata_entry(
            &mut builder,
            METADATA,
            &ClipMeta {
                num_frames: 1,
                width: 2,
                height: 3,
            },
        )
        .unwrap();
        finish_encoder(builder).unwrap();

        let err = ClipBundle::read_archive(&path).unwrap_err();
        assert!(matches!(err, Error::Archive { .. }));
    }

    #[test]
    fn scene_count_mismatch_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");

        let mut builder = new_encoder(&path).unwrap();
        append_entry(&mut builder, FIRST_IMAGE, b"img").unwrap();
        metadata_entry(
            &mut builder,
            METADATA,
            &SceneSetMeta {
                width: 4,
                height: 4,
                scene_count: 2,
            },
        )
        .unwrap();
        // Only one scene folder on disk.
        append_entry(&mut builder, "scenes/0/video.webm", b"v").unwrap();
        append_entry(&mut builder, "scenes/0/last.jpg", b"l").unwrap();
        metadata_entry(
            &mut builder,
            "scenes/0/data.json",
            &SceneMeta {
                num_frames: 5,
                duration: 1.0,
            },
        )
        .unwrap();
        finish_encoder(builder).unwrap();

        let err = SceneSet::read_archive(&path).unwrap_err();
        assert!(matches!(err, Error::Archive { .. }));
    }

    #[test]
    fn scene_entry_parsing() {
        assert_eq!(scene_entry("scenes/0/video.webm"), Some((0, "video.webm")));
        assert_eq!(scene_entry("scenes/10/last.jpg"), Some((10, "last.jpg")));
        assert_eq!(scene_entry("first.jpg"), None);
        assert_eq!(scene_entry("scenes/x/video.webm"), None);
        assert_eq!(scene_entry("scenes/3"), None);
    }

    #[test]
    fn truncated_archive_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entry");
        clip_fixture().write_archive(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(ClipBundle::read_archive(&path).is_err());
    }
}
