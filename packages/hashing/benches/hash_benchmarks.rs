//! Throughput benchmarks for the SHA-2 and HMAC primitives

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jwx_hashing::{HmacSha256, HmacSha512, Sha2, Sha256, Sha512};

/// Benchmark digests across payload sizes typical for tokens
fn benchmark_hash_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_throughput");

    for size in [64usize, 1024, 65536] {
        group.throughput(Throughput::Bytes(size as u64));
        let data = vec![0u8; size];

        group.bench_with_input(BenchmarkId::new("SHA256", size), &data, |b, data| {
            b.iter(|| std::hint::black_box(Sha256::digest(data)));
        });

        group.bench_with_input(BenchmarkId::new("SHA512", size), &data, |b, data| {
            b.iter(|| std::hint::black_box(Sha512::digest(data)));
        });
    }
    group.finish();
}

/// Benchmark keyed MACs with precomputed pads
fn benchmark_hmac(c: &mut Criterion) {
    let mut group = c.benchmark_group("hmac");
    let data = vec![0u8; 1024];
    let hs256 = HmacSha256::new(&[7u8; 32]);
    let hs512 = HmacSha512::new(&[7u8; 64]);

    group.bench_function("HMAC-SHA256/1KB", |b| {
        b.iter(|| std::hint::black_box(hs256.compute_vec(&data)));
    });
    group.bench_function("HMAC-SHA512/1KB", |b| {
        b.iter(|| std::hint::black_box(hs512.compute_vec(&data)));
    });
    group.bench_function("HMAC-SHA256/setup", |b| {
        b.iter(|| std::hint::black_box(HmacSha256::new(&[7u8; 32])));
    });
    group.finish();
}

criterion_group!(benches, benchmark_hash_algorithms, benchmark_hmac);
criterion_main!(benches);
