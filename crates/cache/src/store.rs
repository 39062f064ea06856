//! Cache store
//!
//! Ties key, root, codec, and workspace together: given a key, either load
//! and decode the existing archive or run the supplied computation inside a
//! scoped workspace, archive its result, and move it into place.
//!
//! There is no per-key locking. Two concurrent misses on the same key both
//! run the full computation and both write; writes go to a unique `.tmp`
//! file and are renamed into place, so the last completed rename wins and
//! readers never observe a partially-written archive. Duplicate work is
//! accepted; entries are pure functions of their key, so recomputation is
//! always safe.

use crate::archive::ArchiveBundle;
use crate::workspace::Workspace;
use crate::{CacheKey, Error, Result, root};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Process-wide handle to the on-disk cache.
///
/// Constructed once at startup and passed by reference into every component
/// that needs it; the root is resolved exactly once, at construction.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open the store at the process-wide cache root, creating it if needed.
    pub fn open() -> Result<Self> {
        let root = root::resolve_cache_root()?;
        info!(root = %root.display(), "cache store opened");
        Ok(Self { root })
    }

    /// Open a store rooted at an explicit directory.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the archive for `key`.
    #[must_use]
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_hex())
    }

    /// Whether an archive for `key` exists.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entry_path(key).exists()
    }

    /// Load the bundle for `key`, or run `compute` in a fresh workspace,
    /// archive its output, and return it.
    ///
    /// `compute` receives the workspace directory; the directory is removed
    /// (best-effort) whether `compute` succeeds or fails. Nothing is written
    /// to the cache unless the whole computation succeeds.
    pub async fn get_or_compute<B, E, F, Fut>(
        &self,
        key: &CacheKey,
        compute: F,
    ) -> std::result::Result<B, E>
    where
        B: ArchiveBundle,
        E: From<Error>,
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = std::result::Result<B, E>>,
    {
        let path = self.entry_path(key);
        if path.exists() {
            debug!(key = %key, "cache hit");
            return B::read_archive(&path).map_err(E::from);
        }

        debug!(key = %key, "cache miss");
        let workspace = Workspace::create().map_err(E::from)?;
        let bundle = compute(workspace.path().to_path_buf()).await?;

        // Unique tmp name per writer; rename-into-place keeps readers from
        // ever seeing a partial archive.
        let tmp = self
            .root
            .join(format!("{}.{}.tmp", key.as_hex(), std::process::id()));
        bundle.write_archive(&tmp).map_err(E::from)?;
        std::fs::rename(&tmp, &path).map_err(|e| E::from(Error::io(e, &path, "rename")))?;
        info!(key = %key, "cache entry written");

        Ok(bundle)
    }
}
