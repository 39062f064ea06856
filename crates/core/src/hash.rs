//! SHA-256 digest helpers
//!
//! Every stable identity in the pipeline (cache keys, toolchain identity,
//! published filenames) is built from these two functions. Composite
//! identities hash the concatenation of already-computed digests rather than
//! raw inputs, so variable-length components can never alias each other
//! (`"ab" + "c"` vs `"a" + "bc"`).

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of arbitrary bytes.
#[must_use]
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// Digest of a sequence of already-computed hex digests.
///
/// The inputs are concatenated in order and hashed once; since each component
/// is fixed-length the concatenation is unambiguous.
#[must_use]
pub fn chain_hex<I, S>(digests: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for d in digests {
        hasher.update(d.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn sha256_hex_is_lowercase_64_chars() {
        let d = sha256_hex(b"anything");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn chain_is_order_sensitive() {
        let a = sha256_hex(b"a");
        let b = sha256_hex(b"b");
        assert_ne!(chain_hex([&a, &b]), chain_hex([&b, &a]));
    }

    #[test]
    fn chained_digests_do_not_alias_raw_concatenation() {
        // sha("ab") + sha("c") must differ from sha("a") + sha("bc")
        let left = chain_hex([sha256_hex(b"ab"), sha256_hex(b"c")]);
        let right = chain_hex([sha256_hex(b"a"), sha256_hex(b"bc")]);
        assert_ne!(left, right);
    }

    #[test]
    fn chain_matches_manual_concatenation() {
        let a = sha256_hex(b"x");
        let b = sha256_hex(b"y");
        let concat = format!("{a}{b}");
        assert_eq!(chain_hex([&a, &b]), sha256_hex(concat.as_bytes()));
    }
}
