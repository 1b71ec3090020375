//! Benchmarks for generators and transformers.
//!
//! Tests:
//! - Raw generator throughput by output size
//! - Per-value cost of the common transformers

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datamask::generator::{CryptoHash, Engine, Generator, Hybrid, RandomBytes, SaltedKeyedHash};
use datamask::limiter::{Int64Limiter, NoiseInt64Limiter};
use datamask::transformer::{
    NoiseInt64Transformer, RandomInt64Transformer, RandomIpTransformer, RandomStringTransformer,
};
use std::hint::black_box;

/// Benchmark generator variants
fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("generators");
    let input = b"john.doe@example.com";

    for size in [8usize, 32, 64, 256] {
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("hybrid_siphash", size), &size, |b, &size| {
            let mut g = Hybrid::new(Box::new(SaltedKeyedHash::new(b"salt")), size, 0).unwrap();
            b.iter(|| black_box(g.generate(black_box(input)).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("random", size), &size, |b, &size| {
            let mut g = RandomBytes::new(size);
            b.iter(|| black_box(g.generate(black_box(input)).unwrap()))
        });

        if size <= 64 {
            group.bench_with_input(BenchmarkId::new("sha3", size), &size, |b, &size| {
                let mut g = CryptoHash::new(b"salt", size).unwrap();
                b.iter(|| black_box(g.generate(black_box(input)).unwrap()))
            });
        }
    }

    group.finish();
}

/// Benchmark per-value transforms with the deterministic engine
fn bench_transformers(c: &mut Criterion) {
    let mut group = c.benchmark_group("transformers");
    let values: Vec<String> = (0..1000).map(|i| format!("user{}@example.com", i)).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("random_int", |b| {
        let mut t = RandomInt64Transformer::new(Int64Limiter::new(0, 1_000_000).unwrap());
        t.set_generator(Engine::Deterministic.generator(b"salt", 8).unwrap())
            .unwrap();
        b.iter(|| {
            for v in &values {
                black_box(t.transform(None, v.as_bytes()).unwrap());
            }
        })
    });

    group.bench_function("noise_int", |b| {
        let mut t = NoiseInt64Transformer::new(0.1, 0.3)
            .unwrap()
            .with_limiter(NoiseInt64Limiter::new(0, 1_000_000).unwrap());
        t.set_generator(Engine::Deterministic.generator(b"salt", 9).unwrap())
            .unwrap();
        b.iter(|| {
            for i in 0..values.len() as i64 {
                black_box(t.transform(None, i * 100).unwrap());
            }
        })
    });

    group.bench_function("random_string_10_100", |b| {
        let mut t = RandomStringTransformer::new("abcdefghijklmnopqrstuvwxyz", 10, 100).unwrap();
        t.set_generator(
            Engine::Deterministic
                .generator(b"salt", t.required_byte_length())
                .unwrap(),
        )
        .unwrap();
        b.iter(|| {
            for v in &values {
                black_box(t.transform(v.as_bytes()).unwrap());
            }
        })
    });

    group.bench_function("random_ip_v6", |b| {
        let mut t = RandomIpTransformer::new("2001:db8::/48".parse().unwrap()).unwrap();
        t.set_generator(Engine::Deterministic.generator(b"salt", 16).unwrap())
            .unwrap();
        b.iter(|| {
            for v in &values {
                black_box(t.transform(None, v.as_bytes()).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generators, bench_transformers);
criterion_main!(benches);
