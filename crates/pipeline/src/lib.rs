//! vidpack pipeline orchestration
//!
//! Wires the lower layers into the loader entry point: key derivation,
//! the clip and scene transcode pipelines, the cache store, and artifact
//! publishing.

mod error;

pub mod clip;
pub mod key;
pub mod loader;
pub mod publish;
pub mod request;
pub mod scenes;

pub use error::{Error, Result};
pub use loader::{Loader, LoaderConfig, LoaderOutput};
pub use publish::{ClipRecord, EmittedAsset, Published, Publisher, SceneRecord, SceneSetRecord};
