use serde::Serialize;
use thiserror::Error;

/// Why a block failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("genesis block does not have the expected shape")]
    GenesisMismatch,
    #[error("index does not follow the previous block")]
    IndexGap,
    #[error("previous_hash does not match the previous block")]
    BrokenLink,
    #[error("proof does not satisfy the difficulty")]
    ProofOfWork,
    #[error("merkle root does not match the transactions")]
    MerkleRootMismatch,
    #[error("stored hash does not match the block contents")]
    HashMismatch,
}

/// Outcome of a full chain walk. Failures are data, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainValidation {
    Valid,
    Invalid { index: u64, reason: InvalidReason },
}

impl ChainValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid { .. } => "invalid",
        }
    }
}
