//! Minimal append-only ledger: blocks bound to their predecessor by hash,
//! to their transactions by a Merkle root, and admitted only after a
//! Proof-of-Work puzzle is solved.
//!
//! ```no_run
//! use merkle_pow_ledger::{Blockchain, merkle, transaction::batch};
//!
//! let mut chain = Blockchain::new(3)?;
//! let txs = batch(["tx1", "tx2", "tx3", "tx4"]);
//! let block = chain.append(txs.clone())?;
//!
//! let proof = merkle::prove_inclusion(&txs, "tx3")?;
//! assert!(merkle::verify_inclusion(&proof, "tx3", block.merkle_root()));
//! assert!(chain.is_valid_chain());
//! # Ok::<(), merkle_pow_ledger::LedgerError>(())
//! ```

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod hasher;
pub mod ledger;
pub mod merkle;
pub mod transaction;

pub use blockchain::{Block, Blockchain, ChainValidation, InvalidReason, MiningOptions};
pub use config::Config;
pub use error::LedgerError;
pub use ledger::Ledger;
pub use merkle::{MerkleProof, MerkleTree};
pub use transaction::Transaction;
