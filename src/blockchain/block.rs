use chrono::Utc;
use serde::Serialize;

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF, GENESIS_TRANSACTIONS};
use crate::error::{LedgerError, Result};
use crate::hasher::{self, Digest};
use crate::merkle::MerkleTree;
use crate::transaction::{self, Transaction};

/// A sealed block. Every field is fixed at construction; `hash` and
/// `merkle_root` are derived from the others and never set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) timestamp: i64, // Unix seconds (UTC)
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) merkle_root: Digest,
    pub(crate) previous_hash: Digest,
    pub(crate) proof: u64,
    pub(crate) hash: Digest,
}

/// Fields covered by the block hash, declared in lexicographic key order so
/// the JSON encoding is canonical.
#[derive(Serialize)]
struct CanonicalHeader<'a> {
    index: u64,
    merkle_root: &'a str,
    previous_hash: &'a str,
    proof: u64,
    timestamp: i64,
}

impl Block {
    /// Create the genesis block. It is trusted, not mined.
    pub fn genesis() -> Self {
        Self::seal(
            0,
            Utc::now().timestamp(),
            transaction::batch(GENESIS_TRANSACTIONS),
            GENESIS_PREVIOUS_HASH.to_string(),
            GENESIS_PROOF,
        )
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        previous_hash: impl Into<Digest>,
        transactions: Vec<Transaction>,
        proof: u64,
    ) -> Result<Self> {
        Self::new_with_timestamp(
            index,
            previous_hash,
            transactions,
            Utc::now().timestamp(),
            proof,
        )
    }

    /// Create a block with an explicit timestamp, rejecting inputs that could
    /// never belong to a valid chain.
    pub fn new_with_timestamp(
        index: u64,
        previous_hash: impl Into<Digest>,
        transactions: Vec<Transaction>,
        timestamp: i64,
        proof: u64,
    ) -> Result<Self> {
        let previous_hash = previous_hash.into();
        if previous_hash.is_empty() {
            return Err(LedgerError::MalformedInput(
                "previous_hash must not be empty".into(),
            ));
        }
        if index == 0 && previous_hash != GENESIS_PREVIOUS_HASH {
            return Err(LedgerError::MalformedInput(format!(
                "block 0 must point at {GENESIS_PREVIOUS_HASH:?}"
            )));
        }
        if index > 0 && !hasher::is_digest(&previous_hash) {
            return Err(LedgerError::MalformedInput(format!(
                "previous_hash {previous_hash:?} is not a lowercase sha256 hex digest"
            )));
        }
        if timestamp < 0 {
            return Err(LedgerError::MalformedInput(format!(
                "timestamp {timestamp} is before the Unix epoch"
            )));
        }

        Ok(Self::seal(index, timestamp, transactions, previous_hash, proof))
    }

    fn seal(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        previous_hash: Digest,
        proof: u64,
    ) -> Self {
        let merkle_root = MerkleTree::build(&transactions).root();
        let hash = hash_header(index, timestamp, &merkle_root, &previous_hash, proof);
        Self {
            index,
            timestamp,
            transactions,
            merkle_root,
            previous_hash,
            proof,
            hash,
        }
    }

    /// Recompute the hash from the header fields.
    pub fn compute_hash(&self) -> Digest {
        hash_header(
            self.index,
            self.timestamp,
            &self.merkle_root,
            &self.previous_hash,
            self.proof,
        )
    }

    /// Recompute the Merkle root from the transactions.
    pub fn compute_merkle_root(&self) -> Digest {
        self.merkle_tree().root()
    }

    pub fn merkle_tree(&self) -> MerkleTree {
        MerkleTree::build(&self.transactions)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn merkle_root(&self) -> &str {
        &self.merkle_root
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Compact JSON of the header with sorted keys, e.g.
/// `{"index":1,"merkle_root":"..","previous_hash":"..","proof":20,"timestamp":1700000000}`.
pub fn canonical_header(
    index: u64,
    timestamp: i64,
    merkle_root: &str,
    previous_hash: &str,
    proof: u64,
) -> String {
    let header = CanonicalHeader {
        index,
        merkle_root,
        previous_hash,
        proof,
        timestamp,
    };
    serde_json::to_string(&header).expect("serialize canonical header")
}

fn hash_header(
    index: u64,
    timestamp: i64,
    merkle_root: &str,
    previous_hash: &str,
    proof: u64,
) -> Digest {
    hasher::digest(canonical_header(
        index,
        timestamp,
        merkle_root,
        previous_hash,
        proof,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::batch;

    const TX1_TX4_ROOT: &str = "773bc304a3b0a626a520a8d6eacc36809ac18c0b174f3ff3cdaf0a4e9c64433d";

    fn prev() -> Digest {
        hasher::digest("prev")
    }

    #[test]
    fn genesis_shape() {
        let b = Block::genesis();
        assert_eq!(b.index(), 0);
        assert_eq!(b.previous_hash(), GENESIS_PREVIOUS_HASH);
        assert_eq!(b.proof(), GENESIS_PROOF);
        assert_eq!(b.transactions(), batch(GENESIS_TRANSACTIONS).as_slice());
        assert_eq!(b.hash(), b.compute_hash());
        assert_eq!(b.merkle_root(), b.compute_merkle_root());
    }

    #[test]
    fn canonical_header_sorts_keys() {
        let json = canonical_header(1, 1_700_000_000, TX1_TX4_ROOT, &prev(), 20);
        assert_eq!(
            json,
            format!(
                r#"{{"index":1,"merkle_root":"{TX1_TX4_ROOT}","previous_hash":"{}","proof":20,"timestamp":1700000000}}"#,
                prev()
            )
        );
    }

    #[test]
    fn known_block_hash() {
        let b = Block::new_with_timestamp(
            1,
            prev(),
            batch(["tx1", "tx2", "tx3", "tx4"]),
            1_700_000_000,
            20,
        )
        .unwrap();
        assert_eq!(b.merkle_root(), TX1_TX4_ROOT);
        assert_eq!(
            b.hash(),
            "724045188f82cdcb632b0a55d4c5af1d96ae6e538ef8a1aca22ba24e4c7d7ebd"
        );
    }

    #[test]
    fn identical_fields_identical_hash() {
        let a = Block::new_with_timestamp(3, prev(), batch(["a", "b"]), 1_650_000_000, 9).unwrap();
        let b = Block::new_with_timestamp(3, prev(), batch(["a", "b"]), 1_650_000_000, 9).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a, b);
    }

    #[test]
    fn each_field_changes_hash() {
        let base = Block::new_with_timestamp(3, prev(), batch(["a", "b"]), 1_650_000_000, 9).unwrap();
        let variants = [
            Block::new_with_timestamp(4, prev(), batch(["a", "b"]), 1_650_000_000, 9),
            Block::new_with_timestamp(3, hasher::digest("other"), batch(["a", "b"]), 1_650_000_000, 9),
            Block::new_with_timestamp(3, prev(), batch(["b", "a"]), 1_650_000_000, 9),
            Block::new_with_timestamp(3, prev(), batch(["a", "b"]), 1_650_000_001, 9),
            Block::new_with_timestamp(3, prev(), batch(["a", "b"]), 1_650_000_000, 10),
        ];
        for variant in variants {
            assert_ne!(variant.unwrap().hash(), base.hash());
        }
    }

    #[test]
    fn tampering_breaks_recomputation() {
        let mut b = Block::new(1, prev(), batch(["tx1", "tx2"]), 7).unwrap();
        b.transactions[0] = Transaction::new("tx1-forged");
        assert_ne!(b.merkle_root(), b.compute_merkle_root());

        b.merkle_root = b.compute_merkle_root();
        assert_ne!(b.hash(), b.compute_hash());
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            Block::new(1, "", vec![], 1),
            Block::new(1, "prev", vec![], 1),
            Block::new(1, prev().to_uppercase(), vec![], 1),
            Block::new(0, prev(), vec![], 1),
            Block::new_with_timestamp(1, prev(), vec![], -5, 1),
        ];
        for case in cases {
            assert!(matches!(case, Err(LedgerError::MalformedInput(_))));
        }
    }

    #[test]
    fn empty_transactions_use_empty_root() {
        let b = Block::new(1, prev(), vec![], 1).unwrap();
        assert_eq!(b.merkle_root(), hasher::EMPTY_DIGEST);
    }

    #[test]
    fn serializes_public_fields() {
        let b = Block::new_with_timestamp(1, prev(), batch(["tx1"]), 1_700_000_000, 20).unwrap();
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["proof"], 20);
        assert_eq!(value["transactions"][0], "tx1");
        assert_eq!(value["hash"], b.hash());
        assert_eq!(value["previous_hash"], prev());
    }
}
