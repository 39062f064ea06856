//! Artifact publishing
//!
//! Turns a decoded bundle into content-named emitted files plus the module
//! record the host build tool serves to application code. Asset URLs are the
//! public asset path joined with the content-hashed filename, so artifacts
//! are immutable and cacheable forever.

use crate::{Error, Result};
use bytes::Bytes;
use serde::Serialize;
use vidpack_core::hash::sha256_hex;
use vidpack_core::{ClipBundle, SceneSet};

/// Hex digits of the content digest folded into published filenames.
const NAME_HASH_LEN: usize = 20;

/// One file to hand to the host build tool's emit step.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedAsset {
    /// Content-hashed filename, unique per payload.
    pub filename: String,
    /// The payload itself.
    pub bytes: Bytes,
}

/// Module record for a single-clip request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    pub first_image: String,
    pub last_image: String,
    pub num_frames: u64,
    pub video: String,
    pub width: u32,
    pub height: u32,
}

/// Module record for a multi-scene request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSetRecord {
    pub first_image: String,
    pub scenes: Vec<SceneRecord>,
    pub width: u32,
    pub height: u32,
}

/// One scene entry within a [`SceneSetRecord`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    pub last_image: String,
    pub video: String,
    pub num_frames: u64,
    pub duration: f64,
}

/// A published bundle: its module record plus the files to emit.
#[derive(Debug)]
pub struct Published<R> {
    pub record: R,
    pub assets: Vec<EmittedAsset>,
}

/// Render a record as the ES module source served for the request.
pub fn module_source<R: Serialize>(record: &R) -> Result<String> {
    let json = serde_json::to_string(record).map_err(|e| Error::serialization(e.to_string()))?;
    Ok(format!("export default {json}"))
}

/// Names and addresses published artifacts under a public asset path.
#[derive(Debug, Clone)]
pub struct Publisher {
    asset_path: String,
}

impl Publisher {
    #[must_use]
    pub fn new(asset_path: impl Into<String>) -> Self {
        Self {
            asset_path: asset_path.into(),
        }
    }

    fn url(&self, filename: &str) -> String {
        format!("{}{filename}", self.asset_path)
    }

    /// `<stem>-<hash>.<ext>` with the hash derived from the payload.
    fn filename(stem: &str, ext: &str, payload: &[u8]) -> String {
        let digest = sha256_hex(payload);
        format!("{stem}-{}.{ext}", &digest[..NAME_HASH_LEN])
    }

    /// Publish a single-clip bundle under `name`.
    #[must_use]
    pub fn publish_clip(&self, name: &str, bundle: &ClipBundle) -> Published<ClipRecord> {
        let first = Self::filename(&format!("{name}-frame-first"), "jpg", &bundle.first_image);
        let last = Self::filename(&format!("{name}-frame-last"), "jpg", &bundle.last_image);
        let video = Self::filename(name, "webm", &bundle.video);

        let record = ClipRecord {
            first_image: self.url(&first),
            last_image: self.url(&last),
            num_frames: bundle.num_frames,
            video: self.url(&video),
            width: bundle.width,
            height: bundle.height,
        };
        let assets = vec![
            EmittedAsset {
                filename: first,
                bytes: bundle.first_image.clone(),
            },
            EmittedAsset {
                filename: last,
                bytes: bundle.last_image.clone(),
            },
            EmittedAsset {
                filename: video,
                bytes: bundle.video.clone(),
            },
        ];
        Published { record, assets }
    }

    /// Publish a multi-scene set under `name`.
    #[must_use]
    pub fn publish_scenes(&self, name: &str, set: &SceneSet) -> Published<SceneSetRecord> {
        let first = Self::filename(&format!("{name}-frame-first"), "jpg", &set.first_image);
        let mut assets = vec![EmittedAsset {
            filename: first.clone(),
            bytes: set.first_image.clone(),
        }];

        let mut scenes = Vec::with_capacity(set.scenes.len());
        for (i, scene) in set.scenes.iter().enumerate() {
            let last = Self::filename(&format!("{name}-scene-{i}-last"), "jpg", &scene.last_image);
            let video = Self::filename(&format!("{name}-scene-{i}"), "webm", &scene.video);
            scenes.push(SceneRecord {
                last_image: self.url(&last),
                video: self.url(&video),
                num_frames: scene.num_frames,
                duration: scene.duration,
            });
            assets.push(EmittedAsset {
                filename: last,
                bytes: scene.last_image.clone(),
            });
            assets.push(EmittedAsset {
                filename: video,
                bytes: scene.video.clone(),
            });
        }

        let record = SceneSetRecord {
            first_image: self.url(&first),
            scenes,
            width: set.width,
            height: set.height,
        };
        Published { record, assets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidpack_core::Scene;

    fn clip_bundle() -> ClipBundle {
        ClipBundle {
            first_image: Bytes::from_static(b"first-jpeg"),
            last_image: Bytes::from_static(b"last-jpeg"),
            video: Bytes::from_static(b"webm-bytes"),
            num_frames: 120,
            width: 640,
            height: 360,
        }
    }

    fn scene_set() -> SceneSet {
        SceneSet {
            first_image: Bytes::from_static(b"poster-jpeg"),
            width: 1280,
            height: 720,
            scenes: vec![
                Scene {
                    video: Bytes::from_static(b"scene-0-webm"),
                    last_image: Bytes::from_static(b"scene-0-jpeg"),
                    num_frames: 48,
                    duration: 2.0,
                },
                Scene {
                    video: Bytes::from_static(b"scene-1-webm"),
                    last_image: Bytes::from_static(b"scene-1-jpeg"),
                    num_frames: 24,
                    duration: 1.0,
                },
            ],
        }
    }

    #[test]
    fn clip_filenames_are_content_hashed() {
        let published = Publisher::new("/").publish_clip("intro", &clip_bundle());
        let names: Vec<&str> = published
            .assets
            .iter()
            .map(|a| a.filename.as_str())
            .collect();

        assert!(names[0].starts_with("intro-frame-first-"));
        assert!(names[0].ends_with(".jpg"));
        assert!(names[1].starts_with("intro-frame-last-"));
        assert!(names[2].starts_with("intro-"));
        assert!(names[2].ends_with(".webm"));

        let expected = &sha256_hex(b"webm-bytes")[..NAME_HASH_LEN];
        assert_eq!(names[2], format!("intro-{expected}.webm"));
    }

    #[test]
    fn identical_payloads_publish_identical_names() {
        let publisher = Publisher::new("/");
        let a = publisher.publish_clip("intro", &clip_bundle());
        let b = publisher.publish_clip("intro", &clip_bundle());
        let names = |p: &Published<ClipRecord>| {
            p.assets
                .iter()
                .map(|a| a.filename.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn record_urls_use_the_asset_path() {
        let published = Publisher::new("https://cdn.example/media/").publish_clip("intro", &clip_bundle());
        assert!(published.record.video.starts_with("https://cdn.example/media/intro-"));
        assert!(published.record.first_image.starts_with("https://cdn.example/media/"));
    }

    #[test]
    fn clip_record_serializes_camel_case() {
        let published = Publisher::new("/").publish_clip("intro", &clip_bundle());
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&published.record).unwrap()).unwrap();
        assert!(json.get("firstImage").is_some());
        assert!(json.get("lastImage").is_some());
        assert!(json.get("numFrames").is_some());
        assert_eq!(json["width"], 640);
        assert_eq!(json["height"], 360);
    }

    #[test]
    fn module_source_is_an_es_default_export() {
        let published = Publisher::new("/").publish_clip("intro", &clip_bundle());
        let source = module_source(&published.record).unwrap();
        assert!(source.starts_with("export default {"));
        assert!(source.ends_with('}'));
    }

    #[test]
    fn scene_assets_are_indexed_in_declared_order() {
        let published = Publisher::new("/").publish_scenes("talk", &scene_set());
        // Poster first, then (last, video) per scene.
        assert_eq!(published.assets.len(), 5);
        assert!(published.assets[0].filename.starts_with("talk-frame-first-"));
        assert!(published.assets[1].filename.starts_with("talk-scene-0-last-"));
        assert!(published.assets[2].filename.starts_with("talk-scene-0-"));
        assert!(published.assets[2].filename.ends_with(".webm"));
        assert!(published.assets[3].filename.starts_with("talk-scene-1-last-"));
        assert!(published.assets[4].filename.starts_with("talk-scene-1-"));

        assert_eq!(published.record.scenes.len(), 2);
        assert_eq!(published.record.scenes[0].num_frames, 48);
        assert!((published.record.scenes[1].duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn asset_path_default_is_root() {
        let publisher = Publisher::new("/");
        let published = publisher.publish_clip("x", &clip_bundle());
        assert!(published.record.video.starts_with("/x-"));
    }
}
