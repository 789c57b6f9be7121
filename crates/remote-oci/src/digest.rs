//! Content digest helpers.

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Compute the SHA256 digest of some content.
///
/// Returns the digest in OCI format: `sha256:<hex>`.
#[must_use]
pub fn sha256_digest(content: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(content)))
}

/// Split a digest string into (algorithm, hash).
///
/// Examples:
/// - "sha256:abc123" -> ("sha256", "abc123")
/// - "abc123" -> ("sha256", "abc123")
pub(crate) fn split_digest(digest: &str) -> (&str, &str) {
    if let Some((algo, hash)) = digest.split_once(':') {
        (algo, hash)
    } else {
        ("sha256", digest)
    }
}

/// Validate an `<algorithm>:<hex>` digest and return its encoded part.
///
/// The encoded part must be non-empty lowercase hex, so it is always a single
/// plain path component.
pub(crate) fn encoded(digest: &str) -> Result<&str> {
    let (algo, hash) = digest
        .split_once(':')
        .ok_or_else(|| Error::invalid_digest(digest, "expected <algorithm>:<hex>"))?;
    let algo_ok = !algo.is_empty()
        && algo
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b"+._-".contains(&b));
    if !algo_ok {
        return Err(Error::invalid_digest(digest, "malformed algorithm"));
    }
    if hash.is_empty() || !hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(Error::invalid_digest(digest, "encoded part must be lowercase hex"));
    }
    Ok(hash)
}

/// Check content against the digest it was fetched by.
///
/// Only sha256 is verified; other algorithms pass through.
pub(crate) fn verify(content: &[u8], expected: &str) -> Result<()> {
    let (algo, _) = split_digest(expected);
    if algo != "sha256" {
        return Ok(());
    }
    let actual = sha256_digest(content);
    if actual == expected {
        Ok(())
    } else {
        Err(Error::digest_mismatch(expected, actual))
    }
}
