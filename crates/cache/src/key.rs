//! Cache key type
//!
//! A cache key is the hex SHA-256 digest identifying one
//! (toolchain version, input content, request, mode) combination. It doubles
//! as the archive filename within the cache root, so the format is validated
//! on construction.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A validated 64-character lowercase hex cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create from a hex digest string, validating length and alphabet.
    pub fn from_hex(hex: impl Into<String>) -> Result<Self> {
        let s = hex.into();
        if s.len() != 64 {
            return Err(Error::key(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(Error::key(
                "key must contain only lowercase hex digits".to_string(),
            ));
        }
        Ok(Self(s))
    }

    /// The hex representation (also the archive filename).
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
