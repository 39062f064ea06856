//! Loader facade
//!
//! The entry point a host build tool calls per asset request: validate
//! options, derive the cache key, load-or-compute the bundle through the
//! cache store, and publish it as emitted files plus an ES module source.

use crate::publish::{EmittedAsset, Publisher, module_source};
use crate::{Error, Result, clip, key, request, scenes};
use std::path::{Path, PathBuf};
use tracing::info;
use vidpack_cache::CacheStore;
use vidpack_core::{ClipBundle, ClipOptions, Mode, SceneOptions, SceneSet, validate_scenes};
use vidpack_engine::{Engine, Profile, Toolchain};

/// Extension given to the workspace input file when the request has none.
const FALLBACK_EXTENSION: &str = "bin";

/// Loader-level configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Public URL prefix for emitted assets.
    pub asset_path: String,
    /// Build mode; gates `ultrafast_dev` and is folded into scene keys.
    pub mode: Mode,
}

impl LoaderConfig {
    /// `ASSET_PATH` (default `/`) and `VIDPACK_MODE` (default production).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            asset_path: std::env::var("ASSET_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "/".to_string()),
            mode: Mode::from_env(),
        }
    }
}

/// What the host build tool gets back for one request.
#[derive(Debug)]
pub struct LoaderOutput {
    /// ES module source to serve in place of the asset.
    pub module_source: String,
    /// Content-named files to emit alongside the bundle.
    pub assets: Vec<EmittedAsset>,
}

/// Per-process asset loader.
///
/// Owns the engine handle, the memoized toolchain identity, and the cache
/// store; construct once and share across requests.
#[derive(Debug)]
pub struct Loader {
    engine: Engine,
    toolchain: Toolchain,
    store: CacheStore,
    publisher: Publisher,
    mode: Mode,
}

impl Loader {
    #[must_use]
    pub fn new(engine: Engine, store: CacheStore, config: LoaderConfig) -> Self {
        Self {
            toolchain: Toolchain::new(engine.clone()),
            engine,
            store,
            publisher: Publisher::new(config.asset_path),
            mode: config.mode,
        }
    }

    /// Build a loader entirely from the environment.
    pub fn from_env() -> Result<Self> {
        let store = CacheStore::open().map_err(Error::from)?;
        Ok(Self::new(Engine::from_env(), store, LoaderConfig::from_env()))
    }

    /// Process a single-clip request.
    pub async fn load_clip(
        &self,
        source: &[u8],
        req: &str,
        options: &ClipOptions,
    ) -> Result<LoaderOutput> {
        options.validate().map_err(Error::from)?;
        let key = key::derive_clip_key(&self.toolchain, source, req).await?;
        info!(request = req, key = %key, "clip request");

        let bundle: ClipBundle = self
            .store
            .get_or_compute(&key, |dir| async move {
                let input = write_input(&dir, req, source)?;
                clip::run(&self.engine, &input, &dir, options).await
            })
            .await?;

        let published = self.publisher.publish_clip(request::stem(req), &bundle);
        Ok(LoaderOutput {
            module_source: module_source(&published.record)?,
            assets: published.assets,
        })
    }

    /// Process a multi-scene request.
    pub async fn load_scenes(
        &self,
        source: &[u8],
        req: &str,
        options: &SceneOptions,
    ) -> Result<LoaderOutput> {
        // Boundary validation precedes everything, the toolchain probe
        // included, so a bad spec fails fast with no engine involvement.
        let bounds = validate_scenes(&options.scenes).map_err(Error::from)?;
        let key = key::derive_scene_key(&self.toolchain, source, req, self.mode).await?;
        info!(request = req, key = %key, scenes = bounds.len(), "scene request");

        let profile = Profile::select(options.ultrafast_dev && self.mode.is_development());
        let set: SceneSet = self
            .store
            .get_or_compute(&key, |dir| {
                let bounds = &bounds;
                async move {
                    let input = write_input(&dir, req, source)?;
                    scenes::run(&self.engine, &input, &dir, bounds, profile).await
                }
            })
            .await?;

        let published = self.publisher.publish_scenes(request::stem(req), &set);
        Ok(LoaderOutput {
            module_source: module_source(&published.record)?,
            assets: published.assets,
        })
    }
}

/// Materialize the raw asset bytes in the workspace, keeping the request's
/// extension so the engine sees a familiar container suffix.
fn write_input(dir: &Path, req: &str, source: &[u8]) -> Result<PathBuf> {
    let ext = request::extension(req).unwrap_or(FALLBACK_EXTENSION);
    let path = dir.join(format!("input.{ext}"));
    std::fs::write(&path, source).map_err(|e| Error::io(e, &path, "write"))?;
    Ok(path)
}
