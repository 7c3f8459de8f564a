//! Token read and write throughput

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jwx_cipher::EncryptionAlgorithm;
use jwx_jwt::{
    JweDescriptor, JwePayload, JwsDescriptor, JwtReader, StaticKeyProvider, TokenValidationPolicy,
};
use jwx_key::{KeyManagementAlgorithm, KeySet, SignatureAlgorithm, SymmetricKey};
use std::sync::Arc;

fn signed_claims(key: &Arc<SymmetricKey>) -> JwsDescriptor {
    JwsDescriptor::new(SignatureAlgorithm::Hs256)
        .with_key(Arc::clone(key))
        .with_issuer("https://issuer.example")
        .with_audience("api")
        .with_claim("sub", "alice")
        .with_claim("scope", "read write")
}

fn benchmark_jws(c: &mut Criterion) {
    let key = Arc::new(SymmetricKey::new(&[0x5a; 32]).with_kid("sig"));
    let descriptor = signed_claims(&key);
    let token = descriptor.encode().expect("encode");

    let reader = JwtReader::new();
    let policy = TokenValidationPolicy::builder()
        .require_signature(Arc::new(StaticKeyProvider::new(KeySet::new(vec![key]))))
        .require_audience("api")
        .build();

    let mut group = c.benchmark_group("jws");
    group.bench_function("write", |b| b.iter(|| descriptor.encode()));
    group.bench_function("read", |b| {
        b.iter(|| reader.try_read_token(std::hint::black_box(&token), &policy))
    });
    group.finish();
}

fn benchmark_jwe(c: &mut Criterion) {
    let sig_key = Arc::new(SymmetricKey::new(&[0x5a; 32]).with_kid("sig").with_use("sig"));
    let mut group = c.benchmark_group("jwe");

    for (alg, enc, size) in [
        (KeyManagementAlgorithm::Direct, EncryptionAlgorithm::Aes128CbcHmacSha256, 32),
        (KeyManagementAlgorithm::Direct, EncryptionAlgorithm::Aes256Gcm, 32),
        (KeyManagementAlgorithm::Aes128Kw, EncryptionAlgorithm::Aes128CbcHmacSha256, 16),
        (KeyManagementAlgorithm::Aes256GcmKw, EncryptionAlgorithm::Aes256Gcm, 32),
    ] {
        let enc_key = Arc::new(
            SymmetricKey::new(&vec![0x42; size])
                .with_kid("enc")
                .with_use("enc"),
        );
        let descriptor = JweDescriptor::new(
            JwePayload::Token(signed_claims(&sig_key)),
            Arc::clone(&enc_key),
            alg,
            enc,
        );
        let token = descriptor.encode().expect("encode");

        let keys = Arc::new(StaticKeyProvider::new(KeySet::new(vec![
            Arc::clone(&sig_key),
            enc_key,
        ])));
        let reader = JwtReader::new().with_provider(keys.clone());
        let policy = TokenValidationPolicy::builder().require_signature(keys).build();
        let id = format!("{alg}+{enc}");

        group.bench_function(BenchmarkId::new("write", &id), |b| b.iter(|| descriptor.encode()));
        group.bench_function(BenchmarkId::new("read", &id), |b| {
            b.iter(|| reader.try_read_token(std::hint::black_box(&token), &policy))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_jws, benchmark_jwe);
criterion_main!(benches);
