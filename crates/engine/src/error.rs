//! Error types for the engine adapter

use miette::Diagnostic;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error type for external engine invocations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The engine binary could not be spawned
    #[error("Failed to spawn {program}")]
    #[diagnostic(
        code(vidpack::engine::spawn),
        help("Is ffmpeg installed and on PATH? Override with VIDPACK_FFMPEG / VIDPACK_FFPROBE")
    )]
    Spawn {
        /// Program that failed to start
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The engine exited with a non-zero status
    #[error("{program} exited with {status}: {stderr_tail}")]
    #[diagnostic(code(vidpack::engine::exited))]
    Exited {
        /// Program that failed
        program: String,
        /// Exit status description
        status: String,
        /// Tail of the captured error stream
        stderr_tail: String,
    },

    /// The engine reported success but the expected output file is absent
    #[error("Engine produced no output at {}", path.display())]
    #[diagnostic(code(vidpack::engine::missing_output))]
    MissingOutput {
        /// Expected output path
        path: Box<Path>,
    },

    /// A probe's textual or JSON output could not be interpreted
    #[error("Failed to parse {what}: {message}")]
    #[diagnostic(code(vidpack::engine::probe))]
    Probe {
        /// What was being probed (frame count, dimensions, ...)
        what: &'static str,
        /// Description of the parse failure
        message: String,
    },

    /// No elapsed-time stamp was found in the engine's progress output
    #[error("No time= progress stamp in engine output; cannot determine duration")]
    #[diagnostic(
        code(vidpack::engine::progress),
        help("The progress log format is engine-version dependent; check the ffmpeg build")
    )]
    Progress,

    /// A memoized failure shared from the one-time toolchain probe
    #[error("{0}")]
    #[diagnostic(code(vidpack::engine::toolchain))]
    Shared(Arc<Error>),
}

impl Error {
    /// Create a probe parse error
    #[must_use]
    pub fn probe(what: &'static str, message: impl Into<String>) -> Self {
        Self::Probe {
            what,
            message: message.into(),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
