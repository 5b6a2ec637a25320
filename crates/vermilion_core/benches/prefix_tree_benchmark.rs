//! # Prefix Tree Benchmark
//!
//! Console command registry throughput:
//! - bulk insertion into a pre-reserved tree
//! - exact lookup, hit and miss
//! - autocomplete reads off the descendant-word cache
//!
//! Run with: `cargo bench --package vermilion_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vermilion_core::PrefixTree;

const SUBSYSTEMS: [&str; 8] = [
    "render", "audio", "physics", "input", "net", "actor", "asset", "script",
];
const ACTIONS: [&str; 8] = [
    "show", "hide", "dump", "reload", "toggle", "trace", "stat", "reset",
];

/// Deterministic console-command-shaped words, all unique.
fn command_words(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{}.{}{}",
                SUBSYSTEMS[i % SUBSYSTEMS.len()],
                ACTIONS[(i / SUBSYSTEMS.len()) % ACTIONS.len()],
                i / (SUBSYSTEMS.len() * ACTIONS.len())
            )
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_commands");

    for count in [64, 1024, 16384] {
        let words = command_words(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &words, |b, words| {
            b.iter(|| {
                let mut tree = PrefixTree::with_reserve(words.len());
                for (value, word) in words.iter().enumerate() {
                    tree.insert_rigid(word, value);
                }
                tree.num_words()
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let words = command_words(1024);
    let mut tree = PrefixTree::with_reserve(words.len());
    for (value, word) in words.iter().enumerate() {
        tree.insert_rigid(word, value);
    }

    c.bench_function("lookup_hit", |b| {
        b.iter(|| {
            let mut found = 0;
            for word in &words {
                if tree.contains(black_box(word)) {
                    found += 1;
                }
            }
            found
        });
    });

    c.bench_function("lookup_miss", |b| {
        b.iter(|| {
            let mut found = 0;
            for word in &words {
                // Same path through the tree, absent at the last character.
                if tree.contains(black_box(&format!("{word}?"))) {
                    found += 1;
                }
            }
            found
        });
    });
}

fn bench_autocomplete(c: &mut Criterion) {
    let words = command_words(1024);
    let mut tree = PrefixTree::with_reserve(words.len());
    for (value, word) in words.iter().enumerate() {
        tree.insert_rigid(word, value);
    }

    c.bench_function("autocomplete_prefix", |b| {
        b.iter(|| {
            let mut total = 0;
            for subsystem in SUBSYSTEMS {
                total += tree.words_with_prefix(black_box(subsystem)).count();
            }
            total
        });
    });
}

criterion_group!(benches, bench_insert, bench_lookup, bench_autocomplete);
criterion_main!(benches);
