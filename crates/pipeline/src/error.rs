//! Pipeline error type, aggregating the lower layers

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] vidpack_core::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] vidpack_cache::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] vidpack_engine::Error),

    #[error("i/o failure during {operation} at {}", path.display())]
    #[diagnostic(code(vidpack::pipeline::io))]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    },

    #[error("failed to serialize the module record: {message}")]
    #[diagnostic(code(vidpack::pipeline::serialize))]
    Serialization { message: String },
}

impl Error {
    pub fn io(source: std::io::Error, path: impl AsRef<Path>, operation: &'static str) -> Self {
        Self::Io {
            source,
            path: path.as_ref().to_path_buf(),
            operation,
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
