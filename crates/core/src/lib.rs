//! Core types for the vidpack asset pipeline
//!
//! This crate holds the pieces every other vidpack crate builds on:
//!
//! - SHA-256 digest helpers for stable identities ([`hash`])
//! - a memoized at-most-once async initializer ([`once::AsyncOnce`])
//! - processing options and scene-boundary validation ([`options`])
//! - in-memory artifact bundle types ([`bundle`])
//!
//! Nothing here touches the filesystem or spawns processes; those concerns
//! live in `vidpack-cache` and `vidpack-engine`.

mod error;
pub mod bundle;
pub mod hash;
pub mod once;
pub mod options;

pub use error::{Error, Result};

pub use bundle::{ClipBundle, Scene, SceneSet};
pub use once::AsyncOnce;
pub use options::{ClipOptions, Mode, SceneBounds, SceneOptions, SceneSpec, validate_scenes};

/// Version of the pipeline itself, folded into the toolchain identity so a
/// vidpack upgrade invalidates every cache entry.
pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");
