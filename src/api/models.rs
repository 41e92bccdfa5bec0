use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, InvalidReason};
use crate::error::{LedgerError, Result};
use crate::hasher::Digest;
use crate::ledger::Ledger;
use crate::merkle::MerkleProof;
use crate::transaction::Transaction;

/// Shared application state: the single ledger instance.
pub struct AppState {
    pub ledger: Ledger,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn with_difficulty(difficulty: u32) -> Result<Self> {
        Ok(Self::new(Ledger::new(difficulty, Default::default())?))
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Deserialize, Default)]
pub struct MineRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub timestamp: i64,
    pub proof: u64,
    pub previous_hash: String,
    pub hash: String,
    pub merkle_root: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "Congratulations, you mined a block!",
            index: block.index(),
            timestamp: block.timestamp(),
            proof: block.proof(),
            previous_hash: block.previous_hash().to_string(),
            hash: block.hash().to_string(),
            merkle_root: block.merkle_root().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub message: String,
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

/* ---------- Merkle API Models ---------- */

#[derive(Deserialize)]
pub struct ProveRequest {
    pub transactions: Vec<Transaction>,
    pub target: Transaction,
}

#[derive(Deserialize)]
pub struct ProveInBlockRequest {
    pub target: Transaction,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub proof: MerkleProof,
    pub target: Transaction,
    pub root: Digest,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/* ---------- Errors ---------- */

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
