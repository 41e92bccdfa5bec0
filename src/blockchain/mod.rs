pub mod block;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use model::Blockchain;
pub use pow::MiningOptions;
pub use validation::{ChainValidation, InvalidReason};

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// A hex digest has 64 characters; more zeros can never be satisfied.
pub const MAX_DIFFICULTY: u32 = 64;

/// `previous_hash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Trusted starting proof; the genesis block is not mined.
pub const GENESIS_PROOF: u64 = 1;

/// Placeholder transaction set of the genesis block.
pub const GENESIS_TRANSACTIONS: [&str; 1] = ["genesis"];
