// ABOUTME: Criterion benchmarks for the tiered cache store with the in-process tier only
// ABOUTME: Measures set/get latency by payload size, LRU eviction, and concurrent access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for cache operations.
//!
//! Every benchmark runs against a `TieredCache` with no durable tier, so the
//! numbers cover serialization, the validity check, and the LRU bookkeeping.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recipe_relay::cache::memory::InMemoryTier;
use recipe_relay::cache::store::{ReadOrder, TieredCache};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Recipe documents of increasing size
#[derive(Debug, Clone, Copy)]
enum PayloadSize {
    Summary,
    Full,
    WithNutrition,
}

impl PayloadSize {
    const fn ingredients(self) -> usize {
        match self {
            Self::Summary => 0,
            Self::Full => 15,
            Self::WithNutrition => 60,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Full => "full",
            Self::WithNutrition => "with_nutrition",
        }
    }
}

fn recipe(id: usize, size: PayloadSize) -> Value {
    let ingredients: Vec<Value> = (0..size.ingredients())
        .map(|i| {
            json!({
                "id": i,
                "name": format!("ingredient {i}"),
                "amount": 1.5,
                "unit": "cup",
                "original": format!("1 1/2 cups ingredient {i}, chopped"),
            })
        })
        .collect();
    json!({
        "id": id,
        "title": format!("Benchmark Recipe {id}"),
        "readyInMinutes": 45,
        "servings": 4,
        "summary": "x".repeat(400),
        "extendedIngredients": ingredients,
    })
}

fn key(index: usize) -> String {
    format!("info:{index}")
}

fn cache(max_entries: usize) -> Arc<TieredCache> {
    Arc::new(TieredCache::new(
        InMemoryTier::new(max_entries),
        None,
        TTL,
        ReadOrder::FastFirst,
    ))
}

/// Benchmark set operations with different payload sizes
#[allow(clippy::cast_possible_truncation)]
fn bench_cache_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_set");

    for size in [PayloadSize::Summary, PayloadSize::Full, PayloadSize::WithNutrition] {
        let payload = recipe(1, size);
        let cache = cache(10_000);

        group.throughput(Throughput::Bytes(payload.to_string().len() as u64));
        group.bench_with_input(BenchmarkId::new("memory", size.name()), &payload, |b, payload| {
            let mut key_index = 0_usize;
            b.iter(|| {
                let key = key(key_index % 10_000);
                key_index = key_index.wrapping_add(1);
                rt.block_on(async { cache.set(black_box(&key), black_box(payload)).await })
            });
        });
    }

    group.finish();
}

/// Benchmark get operations (hits vs misses)
fn bench_cache_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_get");

    let cache = cache(10_000);
    rt.block_on(async {
        for i in 0..1000 {
            let _ = cache.set(&key(i), &recipe(i, PayloadSize::Full)).await;
        }
    });

    group.bench_function("memory_hit", |b| {
        let mut key_index = 0_usize;
        b.iter(|| {
            let key = key(key_index % 1000);
            key_index = key_index.wrapping_add(1);
            rt.block_on(async { black_box(cache.get(black_box(&key)).await) })
        });
    });

    group.bench_function("memory_miss", |b| {
        let mut key_index = 10_000_usize;
        b.iter(|| {
            let key = key(key_index);
            key_index = key_index.wrapping_add(1);
            rt.block_on(async { black_box(cache.get(black_box(&key)).await) })
        });
    });

    group.finish();
}

/// Benchmark writes into a full tier, each one evicting the oldest entry
fn bench_cache_eviction(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_eviction");

    let cache = cache(100);
    let payload = recipe(1, PayloadSize::Full);
    rt.block_on(async {
        for i in 0..100 {
            let _ = cache.set(&key(i), &payload).await;
        }
    });

    group.bench_function("set_into_full_tier", |b| {
        let mut key_index = 100_usize;
        b.iter(|| {
            let key = key(key_index);
            key_index = key_index.wrapping_add(1);
            rt.block_on(async { cache.set(black_box(&key), black_box(&payload)).await })
        });
    });

    group.finish();
}

/// Benchmark concurrent cache operations
fn bench_cache_concurrent(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_concurrent");
    group.sample_size(50);

    let cache = cache(10_000);
    let payload = recipe(1, PayloadSize::Full);
    rt.block_on(async {
        for i in 0..1000 {
            let _ = cache.set(&key(i), &payload).await;
        }
    });

    group.throughput(Throughput::Elements(10));
    group.bench_function("10_parallel_reads", |b| {
        b.iter(|| {
            rt.block_on(async {
                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let cache = Arc::clone(&cache);
                        tokio::spawn(async move { cache.get(&key(i)).await })
                    })
                    .collect();

                for handle in handles {
                    let _ = handle.await;
                }
            });
        });
    });

    group.throughput(Throughput::Elements(20));
    group.bench_function("mixed_10_reads_10_writes", |b| {
        let mut write_index = 2000_usize;
        b.iter(|| {
            rt.block_on(async {
                let mut handles = Vec::with_capacity(20);

                for i in 0..10 {
                    let cache = Arc::clone(&cache);
                    handles.push(tokio::spawn(async move {
                        let _ = cache.get(&key(i)).await;
                    }));
                }

                for i in 0..10 {
                    let cache = Arc::clone(&cache);
                    let payload = payload.clone();
                    let key = key(write_index + i);
                    handles.push(tokio::spawn(async move {
                        let _ = cache.set(&key, &payload).await;
                    }));
                }

                for handle in handles {
                    let _ = handle.await;
                }
            });
            write_index = write_index.wrapping_add(10);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cache_set,
    bench_cache_get,
    bench_cache_eviction,
    bench_cache_concurrent
);
criterion_main!(benches);
