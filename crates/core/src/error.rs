//! Error types shared by the core crate

use miette::Diagnostic;
use thiserror::Error;

/// Error type for core validation and identity operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Invalid processing options supplied by the caller
    #[error("Configuration error: {message}")]
    #[diagnostic(code(vidpack::core::config))]
    Configuration {
        /// Description of the invalid configuration
        message: String,
    },

    /// Scene boundary specification violates the ordering contract
    #[error("Invalid scene boundaries: {message}")]
    #[diagnostic(
        code(vidpack::core::scenes),
        help("Scene end times must be strictly increasing; only the last scene may omit `end`")
    )]
    SceneBoundaries {
        /// Description of the boundary violation
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create a scene boundary error
    #[must_use]
    pub fn scene_boundaries(msg: impl Into<String>) -> Self {
        Self::SceneBoundaries {
            message: msg.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
