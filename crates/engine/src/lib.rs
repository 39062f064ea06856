//! ffmpeg/ffprobe adapter for vidpack
//!
//! The external engine is an opaque out-of-process command: this crate owns
//! every invocation of it (transcodes, frame extraction, probes, the version
//! banner) and the parsing of its textual output. Nothing else in the
//! workspace spawns processes.

mod error;
pub mod command;
pub mod duration;
pub mod identity;
pub mod probe;
pub mod transcode;

pub use error::{Error, Result};

pub use command::{Engine, EngineOutput};
pub use duration::{parse_progress_duration, scene_duration};
pub use identity::{Toolchain, toolchain_identity};
pub use probe::Dimensions;
pub use transcode::Profile;
