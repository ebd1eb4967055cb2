//! # Graph Engine Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | dispatch | `recipes` query: guards, store, composition of N recipes |
//! | compose | `search` union tagging |
//! | fan-out | one `addRecipe` publish to N live subscribers |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ge_04_operation_dispatcher::OperationRequest;
use ge_05_recipes::InMemoryRecipeStore;
use ge_tests::fixtures::{cookbook, engine};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => panic!("failed to build runtime: {e}"),
    }
}

fn bench_recipes_query(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("dispatch");
    group.measurement_time(Duration::from_secs(5));

    for take in [1u64, 10, 25, 50] {
        let (dispatcher, _bus) = engine(Arc::new(InMemoryRecipeStore::with_recipes(cookbook(50))));
        group.throughput(Throughput::Elements(take));
        group.bench_with_input(BenchmarkId::new("recipes", take), &take, |b, &take| {
            b.iter(|| {
                let request = OperationRequest::new("recipes").argument("take", take);
                black_box(rt.block_on(dispatcher.execute(request)).is_ok())
            })
        });
    }

    group.finish();
}

fn bench_search_union(c: &mut Criterion) {
    let rt = runtime();
    let (dispatcher, _bus) = engine(Arc::new(InMemoryRecipeStore::new()));

    c.bench_function("compose/search", |b| {
        b.iter(|| black_box(rt.block_on(dispatcher.execute(OperationRequest::new("search"))).is_ok()))
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("fan-out");

    for subscribers in [1usize, 10, 100] {
        let (dispatcher, _bus) = engine(Arc::new(InMemoryRecipeStore::new()));
        let mut live = Vec::with_capacity(subscribers);
        for _ in 0..subscribers {
            match rt.block_on(dispatcher.subscribe(OperationRequest::new("recipeAdded"))) {
                Ok(sub) => live.push(sub),
                Err(e) => panic!("subscribe failed: {e}"),
            }
        }

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("addRecipe", subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    let request = OperationRequest::new("addRecipe")
                        .argument("newRecipeData", json!({"title": "Bench"}));
                    black_box(rt.block_on(dispatcher.execute(request)).is_ok());
                    // Keep buffers from filling so every iteration delivers.
                    for sub in live.iter_mut() {
                        while let Ok(Some(_)) = sub.try_next_event() {}
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_recipes_query, bench_search_union, bench_publish_fanout);
criterion_main!(benches);
