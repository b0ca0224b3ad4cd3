#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use primemap::{LinearProbingMap, SeparateChainingMap};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = proptest::collection::vec(any::<(String, String)>(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    let mut probing_map = LinearProbingMap::try_new(ITEMS_AMOUNT, 0.5).unwrap();
    let mut chaining_map = SeparateChainingMap::try_new(ITEMS_AMOUNT, 4.0).unwrap();
    let mut rust_map = HashMap::new();
    group.bench_function("linear probing put", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                probing_map.put(key, value).unwrap();
            }
        });
    });
    group.bench_function("separate chaining put", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                chaining_map.put(key, value);
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
        });
    });
    group.bench_function("linear probing get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = probing_map.get(key);
            }
        });
    });
    group.bench_function("separate chaining get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = chaining_map.get(key);
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = rust_map.get(key);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
