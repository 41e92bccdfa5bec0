use log::debug;

use super::proof::{MerkleProof, ProofStep};
use crate::error::{LedgerError, Result};
use crate::hasher::{self, Digest, EMPTY_DIGEST};

/// Binary hash tree kept level by level, leaves first.
///
/// Odd levels are padded positionally while the next level is built: the
/// last digest is paired with itself. The padding is never stored, so every
/// recorded level holds only real nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build the tree over transaction payloads in the given order.
    pub fn build<T: AsRef<[u8]>>(transactions: &[T]) -> Self {
        let leaves = transactions.iter().map(|tx| hasher::digest(tx)).collect();
        Self::from_leaves(leaves)
    }

    /// Build the tree over already hashed leaves.
    pub fn from_leaves(leaves: Vec<Digest>) -> Self {
        let mut levels = vec![leaves];

        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hasher::digest_pair(left, right),
                    [last] => hasher::digest_pair(last, last),
                    _ => unreachable!("chunks(2) yields one or two items"),
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// Root digest. An empty tree has the digest of the empty input.
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|level| level.first())
            .cloned()
            .unwrap_or_else(|| EMPTY_DIGEST.to_string())
    }

    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Number of recorded levels, leaves and root included.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Index of the first leaf equal to `leaf`. Duplicate payloads resolve to
    /// the lowest index.
    pub fn position(&self, leaf: &str) -> Option<usize> {
        self.levels.first()?.iter().position(|l| l == leaf)
    }

    /// Inclusion proof for the first occurrence of `target`.
    pub fn prove(&self, target: impl AsRef<[u8]>) -> Result<MerkleProof> {
        let leaf = hasher::digest(target);
        let index = self.position(&leaf).ok_or(LedgerError::TransactionNotFound)?;
        debug!("MERKLE - proving leaf #{index} of {}", self.leaf_count());
        self.proof_at(index).ok_or(LedgerError::TransactionNotFound)
    }

    /// Inclusion proof for the leaf at `index`, or `None` when out of range.
    pub fn proof_at(&self, mut index: usize) -> Option<MerkleProof> {
        if index >= self.leaf_count() {
            return None;
        }

        // The root level contributes nothing to the path.
        let below_root = &self.levels[..self.levels.len() - 1];
        let mut steps = Vec::with_capacity(below_root.len());

        for level in below_root {
            let is_left = index % 2 == 0;
            let sibling_index = if is_left {
                if index + 1 < level.len() { index + 1 } else { index }
            } else {
                index - 1
            };
            steps.push(ProofStep {
                sibling: level[sibling_index].clone(),
                is_left,
            });
            index /= 2;
        }

        Some(MerkleProof::new(steps))
    }
}
