use core::hint::black_box;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use strmap::StrMap;

const SIZES: &[usize] = &[1_000, 50_000];

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(OsRng.try_next_u64().unwrap());
    (0..count)
        .map(|_| format!("key:{:016x}", rng.random::<u64>()))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(BenchmarkId::new("strmap", size), |b| {
            b.iter(|| {
                let mut map = StrMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i).unwrap();
                }
                black_box(map.len())
            })
        });

        group.bench_function(BenchmarkId::new("hashbrown", size), |b| {
            b.iter(|| {
                let mut map = HashbrownMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                black_box(map.len())
            })
        });

        group.bench_function(BenchmarkId::new("std", size), |b| {
            b.iter(|| {
                let mut map = std::collections::HashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                black_box(map.len())
            })
        });
    }
    group.finish();
}

fn bench_lookup_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_hit");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut map = StrMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_str(), i).unwrap();
        }
        group.bench_function(BenchmarkId::new("strmap", size), |b| {
            b.iter(|| {
                let mut sum = 0usize;
                for key in &keys {
                    sum += map.get(key).copied().unwrap();
                }
                black_box(sum)
            })
        });

        let mut map = HashbrownMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_str(), i);
        }
        group.bench_function(BenchmarkId::new("hashbrown", size), |b| {
            b.iter(|| {
                let mut sum = 0usize;
                for key in &keys {
                    sum += map.get(key.as_str()).copied().unwrap();
                }
                black_box(sum)
            })
        });
    }
    group.finish();
}

/// Insert-then-remove churn, the workload that stresses tombstone
/// accumulation and the in-place purge.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64 * 2));

        group.bench_function(BenchmarkId::new("strmap", size), |b| {
            b.iter(|| {
                let mut map = StrMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i).unwrap();
                }
                for key in &keys {
                    black_box(map.remove(key));
                }
                black_box(map.len())
            })
        });

        group.bench_function(BenchmarkId::new("hashbrown", size), |b| {
            b.iter(|| {
                let mut map = HashbrownMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.as_str(), i);
                }
                for key in &keys {
                    black_box(map.remove(key.as_str()));
                }
                black_box(map.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup_hit, bench_churn);
criterion_main!(benches);
