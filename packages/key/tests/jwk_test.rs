//! JWK parsing, key use filtering and per-key provider caching

use jwx_cipher::EncryptionAlgorithm;
use jwx_key::{KeyError, KeyManagementAlgorithm, KeySet, SignatureAlgorithm, SymmetricKey};
use std::sync::Arc;

// RFC 7517 Appendix A.3
const JWKS: &str = r#"{"keys":[
    {"kty":"oct","alg":"A128KW","k":"GawgguFyGrWKav7AX4VKUg"},
    {"kty":"EC","crv":"P-256","x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4","y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM","use":"enc","kid":"1"},
    {"kty":"oct","k":"AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow","kid":"HMAC key used in JWS spec Appendix A.1 example","use":"sig"}
]}"#;

#[test]
fn test_key_set_skips_non_symmetric_keys() {
    let set = KeySet::from_json(JWKS).expect("valid JWKS");
    assert_eq!(set.len(), 2);

    let kw = &set.keys()[0];
    assert_eq!(kw.key_size_in_bits(), 128);
    assert_eq!(kw.alg(), Some("A128KW"));
    assert!(kw.kid().is_none());

    let hmac = set
        .find("HMAC key used in JWS spec Appendix A.1 example")
        .expect("kid lookup");
    assert_eq!(hmac.key_size_in_bits(), 512);
    assert!(hmac.is_suitable_for_signature());
    assert!(!hmac.is_suitable_for_encryption());
}

#[test]
fn test_single_jwk() {
    let key = SymmetricKey::from_jwk_json(
        r#"{"kty":"oct","kid":"k1","use":"enc","k":"GawgguFyGrWKav7AX4VKUg"}"#,
    )
    .expect("valid JWK");
    assert_eq!(key.kid(), Some("k1"));
    assert_eq!(key.key_use(), Some("enc"));
    assert!(key.is_suitable_for_encryption());

    let err = SymmetricKey::from_jwk_json(r#"{"kty":"RSA","n":"AQAB","e":"AQAB"}"#)
        .expect_err("RSA keys are out of scope");
    assert!(matches!(err, KeyError::UnsupportedKeyType(kty) if kty == "RSA"));

    let err = SymmetricKey::from_jwk_json(r#"{"kty":"oct"}"#).expect_err("missing k");
    assert!(matches!(err, KeyError::InvalidKeyFormat(_)));

    let err = SymmetricKey::from_jwk_json(r#"{"kty":"oct","k":"not base64!"}"#)
        .expect_err("bad k");
    assert!(matches!(err, KeyError::InvalidKeyFormat(_)));

    let err = SymmetricKey::from_jwk_json("[]").expect_err("not an object");
    assert!(matches!(err, KeyError::Json(_)));
}

#[test]
fn test_use_filtering() {
    let plain = SymmetricKey::new(&[1u8; 16]);
    assert!(plain.is_suitable_for_encryption());
    assert!(plain.is_suitable_for_signature());

    let empty = SymmetricKey::new(&[1u8; 16]).with_use("");
    assert!(empty.is_suitable_for_encryption());

    let sig = SymmetricKey::new(&[1u8; 16]).with_use("sig");
    assert!(!sig.is_suitable_for_encryption());
}

#[test]
fn test_providers_are_cached_per_algorithm() {
    let key = SymmetricKey::generate(256).expect("256 bit key");
    assert_eq!(key.cached_provider_count(), 0);

    let a = key
        .authenticated_encryptor(EncryptionAlgorithm::Aes256Gcm)
        .expect("32 byte key");
    let b = key
        .authenticated_encryptor(EncryptionAlgorithm::Aes256Gcm)
        .expect("cached");
    assert!(Arc::ptr_eq(&a, &b));

    let cbc = key
        .authenticated_encryptor(EncryptionAlgorithm::Aes128CbcHmacSha256)
        .expect("32 byte key");
    assert_eq!(cbc.algorithm(), EncryptionAlgorithm::Aes128CbcHmacSha256);

    let w1 = key
        .key_wrapper(EncryptionAlgorithm::Aes128Gcm, KeyManagementAlgorithm::Aes256Kw)
        .expect("A256KW");
    let w2 = key
        .key_wrapper(EncryptionAlgorithm::Aes256Gcm, KeyManagementAlgorithm::Aes256Kw)
        .expect("A256KW");
    assert!(!Arc::ptr_eq(&w1, &w2), "wrappers are keyed by (enc, alg)");

    let s1 = key.signer(SignatureAlgorithm::Hs256).expect("HS256");
    let s2 = key.signer(SignatureAlgorithm::Hs256).expect("HS256");
    assert!(Arc::ptr_eq(&s1, &s2));

    assert_eq!(key.cached_provider_count(), 5);
}

#[test]
fn test_failed_creation_is_not_cached() {
    let key = SymmetricKey::new(&[0u8; 16]);
    let err = key
        .authenticated_encryptor(EncryptionAlgorithm::Aes256CbcHmacSha512)
        .err()
        .expect("16 bytes is too short");
    assert!(matches!(err, KeyError::Cipher(_)));

    let err = key.signer(SignatureAlgorithm::Hs256).expect_err("short HMAC key");
    assert!(matches!(err, KeyError::KeyTooShort { minimum: 32, actual: 16 }));
    assert_eq!(key.cached_provider_count(), 0);
}

#[test]
fn test_signer_round_trip() {
    let key = SymmetricKey::new(&[0x0b; 64]);
    for alg in [
        SignatureAlgorithm::Hs256,
        SignatureAlgorithm::Hs384,
        SignatureAlgorithm::Hs512,
    ] {
        let signer = key.signer(alg).expect("long enough");
        let signature = signer.sign(b"header.payload");
        assert_eq!(signature.len(), alg.signature_size());
        assert!(signer.verify(b"header.payload", &signature));
        assert!(!signer.verify(b"header.payloaD", &signature));
        assert!(!signer.verify(b"header.payload", &signature[1..]));
    }
    assert!(key.signer(SignatureAlgorithm::None).is_err());
}

#[test]
fn test_debug_redacts_secret() {
    let key = SymmetricKey::new(b"super secret key material 123456").with_kid("visible");
    let rendered = format!("{key:?}");
    assert!(rendered.contains("REDACTED"));
    assert!(rendered.contains("visible"));
    assert!(!rendered.contains("super secret"));
}

#[test]
fn test_generate_rejects_partial_bytes() {
    assert!(SymmetricKey::generate(0).is_err());
    assert!(SymmetricKey::generate(100).is_err());
    assert_eq!(
        SymmetricKey::generate(192).expect("24 bytes").as_bytes().len(),
        24
    );
}
