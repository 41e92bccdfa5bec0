//! Proof-of-Work puzzle.
//!
//! A proof is accepted when `sha256(decimal(proof² - previous²))` starts with
//! `difficulty` hex zeros. The difference can be negative, in which case the
//! decimal text carries a leading `-`.

use log::debug;
use rayon::prelude::*;

use crate::error::{LedgerError, Result};
use crate::hasher::{self, Digest};

/// How the search is run at the service boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningOptions {
    /// Give up after this many candidates.
    pub max_attempts: Option<u64>,
    /// Split the search across the rayon pool.
    pub parallel: bool,
}

/// Decimal text of `proof² - previous²`, computed exactly.
pub fn puzzle_input(proof: u64, previous_proof: u64) -> String {
    // (2^64 - 1)^2 still fits in a u128.
    let new_sq = u128::from(proof) * u128::from(proof);
    let prev_sq = u128::from(previous_proof) * u128::from(previous_proof);
    if new_sq >= prev_sq {
        (new_sq - prev_sq).to_string()
    } else {
        format!("-{}", prev_sq - new_sq)
    }
}

pub fn puzzle_digest(proof: u64, previous_proof: u64) -> Digest {
    hasher::digest(puzzle_input(proof, previous_proof))
}

/// True if the first `difficulty` characters of `digest` are all `'0'`.
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    let n = difficulty as usize;
    digest.len() >= n && digest.bytes().take(n).all(|b| b == b'0')
}

pub fn is_valid_proof(proof: u64, previous_proof: u64, difficulty: u32) -> bool {
    meets_difficulty(&puzzle_digest(proof, previous_proof), difficulty)
}

/// Smallest proof >= 1 that satisfies the puzzle. Blocks until found.
pub fn solve(previous_proof: u64, difficulty: u32) -> u64 {
    let mut candidate = 1u64;
    loop {
        if is_valid_proof(candidate, previous_proof, difficulty) {
            debug!("POW - solved prev={previous_proof} diff={difficulty} proof={candidate}");
            return candidate;
        }
        candidate = candidate.wrapping_add(1);
    }
}

/// Same as [`solve`] but tries at most `max_attempts` candidates.
pub fn solve_bounded(previous_proof: u64, difficulty: u32, max_attempts: u64) -> Result<u64> {
    (1..=max_attempts)
        .find(|&candidate| is_valid_proof(candidate, previous_proof, difficulty))
        .ok_or(LedgerError::MiningTimeout {
            attempts: max_attempts,
        })
}

/// Candidates handed to the rayon pool per round of the parallel search.
const SEARCH_WINDOW: u64 = 1 << 14;

/// Parallel search that still returns the smallest valid proof, so the
/// result is identical to [`solve`].
pub fn solve_parallel(previous_proof: u64, difficulty: u32) -> u64 {
    search_windows(previous_proof, difficulty, u64::MAX, SEARCH_WINDOW)
        .expect("proof space exhausted (practically impossible)")
}

fn solve_parallel_bounded(previous_proof: u64, difficulty: u32, max_attempts: u64) -> Result<u64> {
    search_windows(previous_proof, difficulty, max_attempts, SEARCH_WINDOW).ok_or(
        LedgerError::MiningTimeout {
            attempts: max_attempts,
        },
    )
}

/// Scan `1..=last` in consecutive windows of `window` candidates, each split
/// across the pool. The lowest hit of the first window holding one is the
/// minimal proof.
fn search_windows(previous_proof: u64, difficulty: u32, last: u64, window: u64) -> Option<u64> {
    let mut start = 1u64;
    while start <= last {
        let end = start.saturating_add(window.max(1) - 1).min(last);
        let hit = (start..=end)
            .into_par_iter()
            .find_first(|&candidate| is_valid_proof(candidate, previous_proof, difficulty));
        if let Some(proof) = hit {
            debug!("POW - solved prev={previous_proof} diff={difficulty} proof={proof} (parallel)");
            return Some(proof);
        }
        if end == last {
            break;
        }
        start = end + 1;
    }
    None
}

/// Run the search according to `options`.
pub fn solve_with(previous_proof: u64, difficulty: u32, options: MiningOptions) -> Result<u64> {
    match (options.parallel, options.max_attempts) {
        (false, None) => Ok(solve(previous_proof, difficulty)),
        (false, Some(max)) => solve_bounded(previous_proof, difficulty, max),
        (true, None) => Ok(solve_parallel(previous_proof, difficulty)),
        (true, Some(max)) => solve_parallel_bounded(previous_proof, difficulty, max),
    }
}
