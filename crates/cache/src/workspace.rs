//! Scoped temporary workspace
//!
//! Every cache-miss computation gets its own uniquely-named directory under
//! the system temp root. Removal is recursive and best-effort on drop, on
//! every exit path (success, error, or task cancellation); a failed removal
//! is swallowed so it can never mask the primary outcome.

use crate::{Error, Result};
use std::path::Path;
use tempfile::TempDir;

/// An exclusively-owned temporary directory, removed on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under the system temp root.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("vidpack-")
            .tempdir()
            .map_err(|e| Error::io_no_path(e, "create temp workspace"))?;
        tracing::debug!(dir = %dir.path().display(), "workspace created");
        Ok(Self { dir })
    }

    /// Path to the workspace directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
