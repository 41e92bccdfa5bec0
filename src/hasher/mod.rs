//! SHA-256 helpers. Every digest in the ledger is a 64 character lowercase
//! hex string produced here.

use sha2::{Digest as _, Sha256};

/// Lowercase hex SHA-256 output.
pub type Digest = String;

/// Length of a hex encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest of the empty input, used as the root of an empty Merkle tree.
pub const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Hash arbitrary bytes and return the hex digest.
pub fn digest(data: impl AsRef<[u8]>) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hex::encode(hasher.finalize())
}

/// Hash the concatenation of two hex digests (`left ++ right`).
///
/// The operands are concatenated as text, so the order matters.
pub fn digest_pair(left: &str, right: &str) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}

/// True if `s` looks like a digest produced by [`digest`].
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
