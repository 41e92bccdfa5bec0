pub mod proof;
pub mod tree;

pub use proof::{MerkleProof, ProofStep, prove_inclusion, verify_inclusion};
pub use tree::MerkleTree;
