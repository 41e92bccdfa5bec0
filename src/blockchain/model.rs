use log::{info, warn};

use super::pow::{self, MiningOptions};
use super::validation::{ChainValidation, InvalidReason};
use super::{Block, GENESIS_PREVIOUS_HASH, MAX_DIFFICULTY};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory, append-only blockchain with a fixed Proof-of-Work difficulty.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32) -> Result<Self> {
        if difficulty == 0 || difficulty > MAX_DIFFICULTY {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }
        Ok(Self {
            chain: vec![Block::genesis()],
            difficulty,
        })
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.chain.get(i))
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Mine the block that would follow the current tip, without appending it.
    pub fn mine_next(&self, transactions: Vec<Transaction>, options: MiningOptions) -> Result<Block> {
        let last = self.last_block();
        let proof = pow::solve_with(last.proof(), self.difficulty, options)?;
        Block::new(last.index() + 1, last.hash(), transactions, proof)
    }

    /// Mine and append a new block holding `transactions`.
    pub fn append(&mut self, transactions: Vec<Transaction>) -> Result<&Block> {
        let block = self.mine_next(transactions, MiningOptions::default())?;
        self.append_premined_block(block)
    }

    /// Admit a block mined elsewhere once it extends the current tip.
    pub fn append_premined_block(&mut self, block: Block) -> Result<&Block> {
        check_successor(self.last_block(), &block, self.difficulty)
            .map_err(LedgerError::RejectedBlock)?;

        info!(
            "MINER - sealed block #{} (hash={}, proof={}, txs={})",
            block.index(),
            block.hash(),
            block.proof(),
            block.transactions().len()
        );
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Walk the whole chain: genesis shape, then linkage, Proof-of-Work and
    /// content integrity of every later block. Stops at the first failure.
    pub fn validate(&self) -> ChainValidation {
        let Some(genesis) = self.chain.first() else {
            return ChainValidation::Valid;
        };

        if let Err(reason) = check_genesis(genesis) {
            warn!("VALIDATE - block #0 rejected: {reason}");
            return ChainValidation::Invalid { index: 0, reason };
        }

        for pair in self.chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if let Err(reason) = check_successor(prev, current, self.difficulty) {
                warn!("VALIDATE - block #{} rejected: {reason}", current.index());
                return ChainValidation::Invalid {
                    index: current.index(),
                    reason,
                };
            }
        }

        ChainValidation::Valid
    }

    pub fn is_valid_chain(&self) -> bool {
        self.validate().is_valid()
    }
}

fn check_genesis(genesis: &Block) -> std::result::Result<(), InvalidReason> {
    if genesis.index() != 0 || genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
        return Err(InvalidReason::GenesisMismatch);
    }
    check_contents(genesis)
}

fn check_successor(
    prev: &Block,
    current: &Block,
    difficulty: u32,
) -> std::result::Result<(), InvalidReason> {
    if current.previous_hash() != prev.hash() {
        return Err(InvalidReason::BrokenLink);
    }
    if !pow::is_valid_proof(current.proof(), prev.proof(), difficulty) {
        return Err(InvalidReason::ProofOfWork);
    }
    if current.index() != prev.index() + 1 {
        return Err(InvalidReason::IndexGap);
    }
    check_contents(current)
}

fn check_contents(block: &Block) -> std::result::Result<(), InvalidReason> {
    if block.merkle_root() != block.compute_merkle_root() {
        return Err(InvalidReason::MerkleRootMismatch);
    }
    if block.hash() != block.compute_hash() {
        return Err(InvalidReason::HashMismatch);
    }
    Ok(())
}
