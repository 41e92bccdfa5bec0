use serde::{Deserialize, Serialize};

use super::tree::MerkleTree;
use crate::error::Result;
use crate::hasher::{self, Digest};

/// One hop of an inclusion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Digest paired with the running hash at this level.
    pub sibling: Digest,
    /// Whether the running hash is the left operand.
    pub is_left: bool,
}

/// Sibling path from a leaf up to (but excluding) the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    steps: Vec<ProofStep>,
}

impl MerkleProof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold the path over the leaf digest of `target`, yielding the root it
    /// commits to.
    pub fn compute_root(&self, target: impl AsRef<[u8]>) -> Digest {
        self.steps
            .iter()
            .fold(hasher::digest(target), |current, step| {
                if step.is_left {
                    hasher::digest_pair(&current, &step.sibling)
                } else {
                    hasher::digest_pair(&step.sibling, &current)
                }
            })
    }
}

/// Build the tree over `transactions` and prove `target` is one of them.
pub fn prove_inclusion<T: AsRef<[u8]>>(
    transactions: &[T],
    target: impl AsRef<[u8]>,
) -> Result<MerkleProof> {
    MerkleTree::build(transactions).prove(target)
}

/// Check `proof` for `target` against `claimed_root` without the
/// transaction list.
pub fn verify_inclusion(proof: &MerkleProof, target: impl AsRef<[u8]>, claimed_root: &str) -> bool {
    proof.compute_root(target) == claimed_root
}
