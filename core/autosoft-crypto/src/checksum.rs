//! SHA-256 checksums rendered as lowercase hex.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a rendered digest (64 hex characters for 256 bits).
pub const DIGEST_HEX_LEN: usize = 64;

/// Computes the SHA-256 digest of `data` as 64 lowercase hex characters.
///
/// Empty input is valid and yields the digest of the empty byte sequence.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compares two hex digests, ignoring ASCII case.
///
/// The comparison runs in constant time over the normalized bytes so the
/// position of the first mismatching character is not observable.
#[must_use]
pub fn checksums_match(expected: &str, actual: &str) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    let expected = expected.to_ascii_lowercase();
    let actual = actual.to_ascii_lowercase();
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}
