use criterion::{Criterion, criterion_group, criterion_main};
use merkle_pow_ledger::blockchain::pow::{solve, solve_parallel};
use merkle_pow_ledger::merkle::MerkleTree;

fn bench_pow(c: &mut Criterion) {
    c.bench_function("solve_difficulty_3", |b| b.iter(|| solve(533, 3)));
    c.bench_function("solve_parallel_difficulty_3", |b| {
        b.iter(|| solve_parallel(533, 3))
    });
}

fn bench_merkle(c: &mut Criterion) {
    let txs: Vec<String> = (0..1000).map(|i| format!("tx-{i}")).collect();
    c.bench_function("merkle_build_1000", |b| b.iter(|| MerkleTree::build(&txs)));
}

criterion_group!(benches, bench_pow, bench_merkle);
criterion_main!(benches);
