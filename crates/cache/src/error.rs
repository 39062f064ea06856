//! Error types for the cache crate

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for cache operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error during cache operations
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(vidpack::cache::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },

    /// No writable cache root could be determined
    #[error("Cache configuration error: {message}")]
    #[diagnostic(code(vidpack::cache::config))]
    Configuration {
        /// Description of the configuration issue
        message: String,
    },

    /// An archive was corrupt, truncated, or missing required entries
    #[error("Corrupt cache archive: {message}")]
    #[diagnostic(
        code(vidpack::cache::archive),
        help("Delete the offending entry from the cache root; it will be recomputed")
    )]
    Archive {
        /// Description of the corruption
        message: String,
    },

    /// Metadata (de)serialization failed
    #[error("Serialization error: {message}")]
    #[diagnostic(code(vidpack::cache::serialization))]
    Serialization {
        /// Description of the serialization issue
        message: String,
    },

    /// A cache key string was not a 64-character lowercase hex digest
    #[error("Invalid cache key: {message}")]
    #[diagnostic(code(vidpack::cache::key))]
    Key {
        /// Description of the invalid key
        message: String,
    },
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an archive corruption error
    #[must_use]
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive {
            message: msg.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    /// Create an invalid-key error
    #[must_use]
    pub fn key(msg: impl Into<String>) -> Self {
        Self::Key { message: msg.into() }
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, Error>;
