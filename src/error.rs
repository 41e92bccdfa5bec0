use thiserror::Error;

use crate::blockchain::InvalidReason;

/// Errors surfaced by the ledger core and its service wrapper.
///
/// Chain validation never produces one of these: it reports through
/// [`crate::blockchain::ChainValidation`] so the ledger stays inspectable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("transaction not found in tree")]
    TransactionNotFound,

    #[error("no block at index {0}")]
    BlockNotFound(u64),

    #[error("difficulty must be between 1 and {max}, got {0}", max = crate::blockchain::MAX_DIFFICULTY)]
    InvalidDifficulty(u32),

    #[error("mining gave up after {attempts} attempts")]
    MiningTimeout { attempts: u64 },

    #[error("block rejected: {0}")]
    RejectedBlock(InvalidReason),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
