//! Cache key derivation
//!
//! A key chains the toolchain identity, the input content digest, and the
//! request digest; the multi-scene key additionally folds in the build mode
//! so development fast-encodes never shadow production artifacts. Any change
//! to any component yields a different key, which is the entire invalidation
//! story: nothing is ever evicted or updated in place.

use crate::Result;
use vidpack_cache::CacheKey;
use vidpack_core::Mode;
use vidpack_core::hash::{chain_hex, sha256_hex};
use vidpack_engine::Toolchain;

/// Key for a single-clip request, from pre-resolved components.
pub fn clip_key_from_parts(toolchain_id: &str, content: &[u8], request: &str) -> Result<CacheKey> {
    let hex = chain_hex([
        toolchain_id.to_string(),
        sha256_hex(content),
        sha256_hex(request),
    ]);
    Ok(CacheKey::from_hex(hex)?)
}

/// Key for a multi-scene request, from pre-resolved components.
pub fn scene_key_from_parts(
    toolchain_id: &str,
    content: &[u8],
    request: &str,
    mode: Mode,
) -> Result<CacheKey> {
    let hex = chain_hex([
        toolchain_id.to_string(),
        sha256_hex(content),
        sha256_hex(request),
        sha256_hex(mode.as_str()),
    ]);
    Ok(CacheKey::from_hex(hex)?)
}

/// Derive the single-clip key, probing the toolchain on first use.
pub async fn derive_clip_key(
    toolchain: &Toolchain,
    content: &[u8],
    request: &str,
) -> Result<CacheKey> {
    let id = toolchain.id().await?;
    clip_key_from_parts(&id, content, request)
}

/// Derive the multi-scene key, probing the toolchain on first use.
pub async fn derive_scene_key(
    toolchain: &Toolchain,
    content: &[u8],
    request: &str,
    mode: Mode,
) -> Result<CacheKey> {
    let id = toolchain.id().await?;
    scene_key_from_parts(&id, content, request, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidpack_engine::toolchain_identity;

    const CONTENT: &[u8] = b"fake video bytes";
    const REQUEST: &str = "/src/assets/intro.mp4?speed=2";

    fn id() -> String {
        toolchain_identity("ffmpeg version 7.0.1")
    }

    #[test]
    fn clip_key_is_deterministic() {
        let a = clip_key_from_parts(&id(), CONTENT, REQUEST).unwrap();
        let b = clip_key_from_parts(&id(), CONTENT, REQUEST).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clip_key_tracks_every_component() {
        let base = clip_key_from_parts(&id(), CONTENT, REQUEST).unwrap();

        let other_toolchain = toolchain_identity("ffmpeg version 6.1");
        assert_ne!(
            base,
            clip_key_from_parts(&other_toolchain, CONTENT, REQUEST).unwrap()
        );
        assert_ne!(base, clip_key_from_parts(&id(), b"other bytes", REQUEST).unwrap());
        assert_ne!(
            base,
            clip_key_from_parts(&id(), CONTENT, "/src/assets/intro.mp4?speed=3").unwrap()
        );
    }

    #[test]
    fn scene_key_folds_in_the_mode() {
        let dev = scene_key_from_parts(&id(), CONTENT, REQUEST, Mode::Development).unwrap();
        let prod = scene_key_from_parts(&id(), CONTENT, REQUEST, Mode::Production).unwrap();
        assert_ne!(dev, prod);
    }

    #[test]
    fn clip_and_scene_keys_never_collide() {
        let clip = clip_key_from_parts(&id(), CONTENT, REQUEST).unwrap();
        let scenes = scene_key_from_parts(&id(), CONTENT, REQUEST, Mode::Production).unwrap();
        assert_ne!(clip, scenes);
    }

    #[test]
    fn keys_are_valid_archive_names() {
        let key = clip_key_from_parts(&id(), CONTENT, REQUEST).unwrap();
        assert_eq!(key.as_hex().len(), 64);
    }
}
