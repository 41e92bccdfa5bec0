use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hasher::{self, Digest};

/// Opaque transaction payload. The ledger imposes no structure on it beyond
/// hashing its UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(String);

impl Transaction {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn payload(&self) -> &str {
        &self.0
    }

    /// Leaf digest used by the Merkle tree.
    pub fn digest(&self) -> Digest {
        hasher::digest(self.0.as_bytes())
    }
}

impl From<&str> for Transaction {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Transaction {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl AsRef<[u8]> for Transaction {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convenience for building a batch from string literals.
pub fn batch<I, T>(payloads: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = T>,
    T: Into<Transaction>,
{
    payloads.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let tx = Transaction::new("alice->bob:5");
        assert_eq!(serde_json::to_string(&tx).unwrap(), r#""alice->bob:5""#);
        let back: Transaction = serde_json::from_str(r#""alice->bob:5""#).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn digest_matches_hasher() {
        let tx = Transaction::from("tx1");
        assert_eq!(tx.digest(), hasher::digest("tx1"));
    }

    #[test]
    fn batch_keeps_order() {
        let txs = batch(["b", "a", "c"]);
        let payloads: Vec<&str> = txs.iter().map(Transaction::payload).collect();
        assert_eq!(payloads, ["b", "a", "c"]);
    }
}
