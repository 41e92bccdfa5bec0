//! Thread-safe ledger service handed to the request layer.
//!
//! Appends are serialized by `writer`; the Proof-of-Work search runs while
//! holding only a read guard, so chain reads and validation keep going during
//! mining. The finished block is pushed under a short write guard, so readers
//! never see a partially built block.

use std::sync::{Mutex, RwLock};

use log::debug;
use serde::Serialize;

use crate::blockchain::{Block, Blockchain, ChainValidation, MiningOptions};
use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::hasher::Digest;
use crate::merkle::{MerkleProof, MerkleTree, verify_inclusion};
use crate::transaction::Transaction;

/// Consistent copy of the chain taken under one read guard.
#[derive(Debug, Clone, Serialize)]
pub struct ChainSnapshot {
    pub length: usize,
    pub difficulty: u32,
    pub chain: Vec<Block>,
}

/// Validation outcome with the chain shape it was computed over, all read
/// under one guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub validation: ChainValidation,
    pub length: usize,
    pub difficulty: u32,
}

/// Inclusion proof together with the root it proves against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionProof {
    pub root: Digest,
    pub leaf_index: usize,
    pub proof: MerkleProof,
}

pub struct Ledger {
    chain: RwLock<Blockchain>,
    writer: Mutex<()>,
    mining: MiningOptions,
}

impl Ledger {
    pub fn new(difficulty: u32, mining: MiningOptions) -> Result<Self> {
        Ok(Self {
            chain: RwLock::new(Blockchain::new(difficulty)?),
            writer: Mutex::new(()),
            mining,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.difficulty, config.mining)
    }

    /// Mine a block over `transactions` and append it.
    pub fn mine(&self, transactions: Vec<Transaction>) -> Result<Block> {
        let _writer = self.writer.lock().expect("writer lock poisoned");

        let block = {
            let bc = self.chain.read().expect("chain lock poisoned");
            bc.mine_next(transactions, self.mining)?
        };

        let mut bc = self.chain.write().expect("chain lock poisoned");
        Ok(bc.append_premined_block(block)?.clone())
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        let bc = self.chain.read().expect("chain lock poisoned");
        ChainSnapshot {
            length: bc.len(),
            difficulty: bc.difficulty(),
            chain: bc.blocks().to_vec(),
        }
    }

    pub fn block(&self, index: u64) -> Option<Block> {
        let bc = self.chain.read().expect("chain lock poisoned");
        bc.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.chain.read().expect("chain lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn difficulty(&self) -> u32 {
        self.chain.read().expect("chain lock poisoned").difficulty()
    }

    pub fn validate(&self) -> ChainValidation {
        self.chain.read().expect("chain lock poisoned").validate()
    }

    pub fn validation_report(&self) -> ValidationReport {
        let bc = self.chain.read().expect("chain lock poisoned");
        ValidationReport {
            validation: bc.validate(),
            length: bc.len(),
            difficulty: bc.difficulty(),
        }
    }

    /// Prove `target` is part of an arbitrary transaction batch.
    pub fn prove_transaction(
        &self,
        transactions: &[Transaction],
        target: &Transaction,
    ) -> Result<TransactionProof> {
        prove_in_tree(&MerkleTree::build(transactions), target)
    }

    /// Prove `target` is part of the block at `index`.
    pub fn prove_in_block(&self, index: u64, target: &Transaction) -> Result<TransactionProof> {
        let tree = {
            let bc = self.chain.read().expect("chain lock poisoned");
            let block = bc.get(index).ok_or(LedgerError::BlockNotFound(index))?;
            block.merkle_tree()
        };
        prove_in_tree(&tree, target)
    }

    pub fn verify_proof(&self, proof: &MerkleProof, target: &Transaction, root: &str) -> bool {
        verify_inclusion(proof, target, root)
    }
}

fn prove_in_tree(tree: &MerkleTree, target: &Transaction) -> Result<TransactionProof> {
    let leaf_index = tree
        .position(&target.digest())
        .ok_or(LedgerError::TransactionNotFound)?;
    let proof = tree
        .proof_at(leaf_index)
        .ok_or(LedgerError::TransactionNotFound)?;
    debug!(
        "PROOF - leaf #{leaf_index} of {} ({} steps)",
        tree.leaf_count(),
        proof.len()
    );
    Ok(TransactionProof {
        root: tree.root(),
        leaf_index,
        proof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::batch;
    use std::sync::Arc;
    use std::thread;

    fn ledger(difficulty: u32) -> Ledger {
        Ledger::new(difficulty, MiningOptions::default()).unwrap()
    }

    #[test]
    fn mine_returns_appended_block() {
        let ledger = ledger(2);
        let block = ledger.mine(batch(["tx1", "tx2"])).unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.block(1), Some(block));
        assert!(ledger.validate().is_valid());
    }

    #[test]
    fn snapshot_is_consistent() {
        let ledger = ledger(1);
        ledger.mine(batch(["a"])).unwrap();
        let snap = ledger.snapshot();
        assert_eq!(snap.length, snap.chain.len());
        assert_eq!(snap.length, 2);
        assert_eq!(snap.difficulty, 1);
        assert_eq!(snap.chain[1].previous_hash(), snap.chain[0].hash());
    }

    #[test]
    fn concurrent_mining_never_forks() {
        let ledger = Arc::new(ledger(1));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.mine(batch([format!("worker-{i}")])).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.len(), 9);
        assert_eq!(ledger.validate(), ChainValidation::Valid);
    }

    #[test]
    fn validation_report_matches_chain_while_mining() {
        let ledger = Arc::new(ledger(1));
        let miner = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..20 {
                    ledger.mine(batch([format!("tx-{i}")])).unwrap();
                }
            })
        };

        let mut last_length = 0;
        while !miner.is_finished() {
            let report = ledger.validation_report();
            assert_eq!(report.validation, ChainValidation::Valid);
            assert_eq!(report.difficulty, 1);
            assert!(report.length >= last_length);
            last_length = report.length;
        }
        miner.join().unwrap();

        let report = ledger.validation_report();
        assert_eq!(report.length, 21);
        assert_eq!(report.length, ledger.snapshot().chain.len());
        assert!(report.validation.is_valid());
    }

    #[test]
    fn bounded_mining_surfaces_timeout() {
        let ledger = Ledger::new(
            3,
            MiningOptions {
                max_attempts: Some(5),
                parallel: false,
            },
        )
        .unwrap();
        assert_eq!(
            ledger.mine(vec![]).unwrap_err(),
            LedgerError::MiningTimeout { attempts: 5 }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn parallel_mining_matches_sequential() {
        let sequential = ledger(2);
        let parallel = Ledger::new(
            2,
            MiningOptions {
                max_attempts: None,
                parallel: true,
            },
        )
        .unwrap();
        let a = sequential.mine(batch(["x"])).unwrap();
        let b = parallel.mine(batch(["x"])).unwrap();
        assert_eq!(a.proof(), b.proof());
    }

    #[test]
    fn prove_and_verify_batch() {
        let ledger = ledger(1);
        let txs = batch(["tx1", "tx2", "tx3", "tx4"]);
        let target = Transaction::new("tx3");

        let proved = ledger.prove_transaction(&txs, &target).unwrap();
        assert_eq!(proved.leaf_index, 2);
        assert_eq!(proved.proof.len(), 2);
        assert!(ledger.verify_proof(&proved.proof, &target, &proved.root));
        assert!(!ledger.verify_proof(&proved.proof, &Transaction::new("tx4"), &proved.root));

        assert_eq!(
            ledger.prove_transaction(&txs, &Transaction::new("nope")),
            Err(LedgerError::TransactionNotFound)
        );
    }

    #[test]
    fn prove_against_mined_block() {
        let ledger = ledger(1);
        let block = ledger.mine(batch(["a", "b", "c"])).unwrap();
        let target = Transaction::new("c");

        let proved = ledger.prove_in_block(1, &target).unwrap();
        assert_eq!(proved.root, block.merkle_root());
        assert!(ledger.verify_proof(&proved.proof, &target, block.merkle_root()));

        assert_eq!(
            ledger.prove_in_block(7, &target),
            Err(LedgerError::BlockNotFound(7))
        );
        assert_eq!(
            ledger.prove_in_block(0, &target),
            Err(LedgerError::TransactionNotFound)
        );
    }
}
