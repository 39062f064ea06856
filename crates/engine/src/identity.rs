//! Toolchain version identity
//!
//! A digest of "this build of the external engine plus this version of the
//! pipeline", folded into every cache key. Probed at most once per process
//! via [`AsyncOnce`], so a long-running build is internally consistent even
//! if the engine is upgraded underneath it; each new process recomputes.

use crate::command::Engine;
use crate::{Error, Result};
use tracing::debug;
use vidpack_core::hash::{chain_hex, sha256_hex};
use vidpack_core::{AsyncOnce, PIPELINE_VERSION};

/// Pure identity derivation from the engine's version banner.
#[must_use]
pub fn toolchain_identity(version_output: &str) -> String {
    chain_hex([sha256_hex(version_output), sha256_hex(PIPELINE_VERSION)])
}

/// Process-wide toolchain identity service.
///
/// Construct once and pass by reference; the version probe runs on the first
/// `id()` call and its outcome (failure included) is shared with every
/// caller for the process lifetime.
#[derive(Debug)]
pub struct Toolchain {
    engine: Engine,
    cell: AsyncOnce<String, Error>,
}

impl Toolchain {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            cell: AsyncOnce::new(),
        }
    }

    /// The toolchain identity digest, probing the engine on first use.
    pub async fn id(&self) -> Result<String> {
        self.cell
            .get_or_init(|| async {
                let version = self.engine.version().await?;
                let id = toolchain_identity(&version);
                debug!(id, "toolchain identity resolved");
                Ok(id)
            })
            .await
            .map_err(Error::Shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_deterministic() {
        let banner = "ffmpeg version 7.0.1 Copyright (c) 2000-2024";
        assert_eq!(toolchain_identity(banner), toolchain_identity(banner));
    }

    #[test]
    fn identity_changes_with_engine_version() {
        assert_ne!(
            toolchain_identity("ffmpeg version 6.1"),
            toolchain_identity("ffmpeg version 7.0")
        );
    }

    #[test]
    fn identity_is_a_hex_digest() {
        let id = toolchain_identity("anything");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn probe_failure_is_memoized() {
        let toolchain = Toolchain::new(Engine::with_binaries(
            "/nonexistent/ffmpeg",
            "/nonexistent/ffprobe",
        ));
        let first = toolchain.id().await;
        let second = toolchain.id().await;
        assert!(first.is_err());
        // The second failure is the shared memoized one, not a fresh probe.
        assert!(matches!(second, Err(Error::Shared(_))));
    }
}
