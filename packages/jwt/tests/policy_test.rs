//! Validation policy: signatures, claims, audience and lifetime

use chrono::{DateTime, Duration, TimeZone, Utc};
use jwx_jwt::validators::{LifetimeValidator, RequiredClaimValidator, Validator};
use jwx_cipher::EncryptionAlgorithm;
use jwx_jwt::{
    BinaryJweDescriptor, Clock, JweDescriptor, JwePayload, Jwt, JwsDescriptor, JwtError,
    JwtReader, StaticKeyProvider, TokenValidationPolicy, ValidationError,
};
use jwx_key::{KeyError, KeyManagementAlgorithm, SignatureAlgorithm, SymmetricKey};
use serde_json::json;
use std::sync::{Arc, Mutex};

struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn at(seconds: i64) -> Arc<Self> {
        let now = Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp");
        Arc::new(Self(Mutex::new(now)))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

const NOW: i64 = 1_700_000_000;
const SIGNING_KEY: [u8; 32] = [0x5a; 32];
const ENCRYPTION_KEY: [u8; 32] = [0x42; 32];

fn read(token: &str, policy: &TokenValidationPolicy) -> Result<Jwt, ValidationError> {
    JwtReader::new().try_read_token(token, policy)
}

fn unsigned(claims: serde_json::Value) -> String {
    let serde_json::Value::Object(map) = claims else {
        panic!("claims must be an object");
    };
    JwsDescriptor::new(SignatureAlgorithm::None)
        .with_payload(map)
        .encode()
        .expect("encode")
}

fn signing_keys(keys: impl IntoIterator<Item = SymmetricKey>) -> Arc<StaticKeyProvider> {
    Arc::new(StaticKeyProvider::from_keys(keys))
}

#[test]
fn test_rfc7515_a1_hs256() {
    const TOKEN: &str = "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.\
        eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ.\
        dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    const KEY: &str = "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow";

    let provider = signing_keys([SymmetricKey::from_base64url(KEY).expect("valid key")]);
    let policy = TokenValidationPolicy::builder()
        .require_signature(provider.clone())
        .require_issuer("joe")
        .build();

    let jwt = read(TOKEN, &policy).expect("RFC 7515 A.1 verifies");
    assert_eq!(jwt.header().typ.as_deref(), Some("JWT"));
    assert_eq!(jwt.issuer(), Some("joe"));
    assert_eq!(jwt.claim("http://example.com/is_root"), Some(&json!(true)));
    assert_eq!(
        jwt.expiration_time(),
        Utc.timestamp_opt(1_300_819_380, 0).single()
    );

    // exp is in 2011
    let with_lifetime = TokenValidationPolicy::builder()
        .require_signature(provider)
        .enable_lifetime_validation(true, Duration::minutes(5))
        .build();
    assert_eq!(
        read(TOKEN, &with_lifetime).expect_err("expired"),
        ValidationError::Expired
    );
}

#[test]
fn test_signature_round_trip_and_failures() {
    let key = Arc::new(SymmetricKey::new(&SIGNING_KEY).with_kid("k1"));
    let token = JwsDescriptor::new(SignatureAlgorithm::Hs256)
        .with_key(Arc::clone(&key))
        .with_claim("sub", "alice")
        .encode()
        .expect("encode");

    let good = TokenValidationPolicy::builder()
        .require_signature(signing_keys([SymmetricKey::new(&SIGNING_KEY).with_kid("k1")]))
        .build();
    let jwt = read(&token, &good).expect("signature verifies");
    assert_eq!(jwt.header().kid.as_deref(), Some("k1"));
    assert_eq!(jwt.signature().len(), 32);
    assert!(jwt.signing_input().is_some_and(|input| token.starts_with(input)));

    for (keys, why) in [
        (vec![SymmetricKey::new(&[0x5b; 32]).with_kid("k1")], "wrong secret"),
        (vec![SymmetricKey::new(&SIGNING_KEY).with_kid("k2")], "other kid"),
        (vec![SymmetricKey::new(&SIGNING_KEY)], "key without kid"),
        (
            vec![SymmetricKey::new(&SIGNING_KEY).with_kid("k1").with_use("enc")],
            "encryption key",
        ),
        (Vec::new(), "no keys"),
    ] {
        let policy = TokenValidationPolicy::builder()
            .require_signature(signing_keys(keys))
            .build();
        assert_eq!(
            read(&token, &policy).expect_err(why),
            ValidationError::SignatureFailed,
            "{why}"
        );
    }

    // signatures are not checked unless required
    let mut forged = token.clone();
    forged.truncate(token.rfind('.').expect("signature separator") + 1);
    forged.push_str("AAAA");
    assert!(read(&forged, &TokenValidationPolicy::no_validation()).is_ok());
    assert_eq!(
        read(&forged, &good).expect_err("forged"),
        ValidationError::SignatureFailed
    );
}

#[test]
fn test_header_without_kid_tries_every_key() {
    let token = JwsDescriptor::new(SignatureAlgorithm::Hs384)
        .with_key(Arc::new(SymmetricKey::new(&[0x33; 48])))
        .with_claim("sub", "bob")
        .encode()
        .expect("encode");

    let policy = TokenValidationPolicy::builder()
        .require_signature(signing_keys([
            SymmetricKey::new(&[0x34; 48]).with_kid("x"),
            SymmetricKey::new(&[0x33; 48]).with_kid("y"),
        ]))
        .build();
    assert!(read(&token, &policy).is_ok());
}

#[test]
fn test_unsecured_tokens() {
    let token = unsigned(json!({"sub": "alice"}));
    assert!(token.ends_with('.'));
    assert!(read(&token, &TokenValidationPolicy::no_validation()).is_ok());

    let keys = signing_keys([SymmetricKey::new(&SIGNING_KEY)]);
    let strict = TokenValidationPolicy::builder()
        .require_signature(keys.clone())
        .build();
    assert_eq!(
        read(&token, &strict).expect_err("alg none"),
        ValidationError::SignatureFailed
    );

    let lenient = TokenValidationPolicy::builder()
        .require_signature(keys)
        .accept_unsecure_token()
        .build();
    assert!(read(&token, &lenient).is_ok());

    // alg none with a signature attached is never accepted
    let with_signature = format!("{token}AAAA");
    assert_eq!(
        read(&with_signature, &lenient).expect_err("none with signature"),
        ValidationError::SignatureFailed
    );
}

#[test]
fn test_writer_key_errors() {
    let missing = JwsDescriptor::new(SignatureAlgorithm::Hs256)
        .encode()
        .expect_err("no key");
    assert!(matches!(missing, JwtError::MissingKey(_)));

    let short = JwsDescriptor::new(SignatureAlgorithm::Hs512)
        .with_key(Arc::new(SymmetricKey::new(&[1u8; 32])))
        .encode()
        .expect_err("short key");
    assert!(matches!(
        short,
        JwtError::Key(KeyError::KeyTooShort {
            minimum: 64,
            actual: 32
        })
    ));
}

#[test]
fn test_required_claims() {
    let token = unsigned(json!({
        "sub": "alice",
        "iss": "https://issuer.example",
        "nothing": null,
        "acr": "silver"
    }));

    let ok = TokenValidationPolicy::builder()
        .require_claim("sub")
        .require_issuer("https://issuer.example")
        .require_claim_value("sub", "alice")
        .build();
    assert!(read(&token, &ok).is_ok());

    let cases = [
        (
            TokenValidationPolicy::builder().require_claim("jti").build(),
            ValidationError::MissingClaim("jti".into()),
        ),
        (
            TokenValidationPolicy::builder().require_claim("nothing").build(),
            ValidationError::MissingClaim("nothing".into()),
        ),
        (
            TokenValidationPolicy::builder().require_issuer("https://other.example").build(),
            ValidationError::InvalidClaim("iss".into()),
        ),
        (
            TokenValidationPolicy::builder().require_acr("gold").build(),
            ValidationError::InvalidClaim("acr".into()),
        ),
    ];
    for (policy, expected) in cases {
        assert_eq!(read(&token, &policy).expect_err("rejected"), expected);
    }

    let silver = TokenValidationPolicy::builder().require_acr("silver").build();
    assert!(read(&token, &silver).is_ok());
}

#[test]
fn test_audience() {
    let policy = TokenValidationPolicy::builder()
        .require_audience("api")
        .build();

    assert!(read(&unsigned(json!({"aud": "api"})), &policy).is_ok());
    assert!(read(&unsigned(json!({"aud": ["web", "api"]})), &policy).is_ok());
    assert_eq!(
        read(&unsigned(json!({"aud": ["web"]})), &policy).expect_err("other audience"),
        ValidationError::InvalidClaim("aud".into())
    );
    assert_eq!(
        read(&unsigned(json!({"sub": "x"})), &policy).expect_err("no audience"),
        ValidationError::MissingClaim("aud".into())
    );
}

#[test]
fn test_lifetime() {
    let clock = ManualClock::at(NOW);
    let policy = |require_exp: bool, skew: i64| {
        TokenValidationPolicy::builder()
            .add_validator(LifetimeValidator::with_clock(
                require_exp,
                Duration::seconds(skew),
                clock.clone(),
            ))
            .build()
    };

    assert!(read(&unsigned(json!({"exp": NOW + 1})), &policy(true, 0)).is_ok());
    assert_eq!(
        read(&unsigned(json!({"exp": NOW})), &policy(true, 0)).expect_err("exp == now"),
        ValidationError::Expired
    );
    assert!(read(&unsigned(json!({"exp": NOW - 30})), &policy(true, 60)).is_ok());

    assert_eq!(
        read(&unsigned(json!({"nbf": NOW + 10})), &policy(false, 0)).expect_err("too early"),
        ValidationError::NotYetValid
    );
    assert!(read(&unsigned(json!({"nbf": NOW + 10})), &policy(false, 60)).is_ok());
    assert!(read(&unsigned(json!({"nbf": NOW})), &policy(false, 0)).is_ok());

    assert_eq!(
        read(&unsigned(json!({"sub": "x"})), &policy(true, 0)).expect_err("no exp"),
        ValidationError::MissingClaim("exp".into())
    );
    assert!(read(&unsigned(json!({"sub": "x"})), &policy(false, 0)).is_ok());
    assert_eq!(
        read(&unsigned(json!({"exp": "soon"})), &policy(false, 0)).expect_err("exp not a number"),
        ValidationError::InvalidClaim("exp".into())
    );

    *clock.0.lock().expect("clock lock") += Duration::seconds(100);
    assert_eq!(
        read(&unsigned(json!({"exp": NOW + 50})), &policy(true, 0)).expect_err("clock moved"),
        ValidationError::Expired
    );
}

#[test]
fn test_signature_runs_before_other_validators() {
    let token = JwsDescriptor::new(SignatureAlgorithm::Hs256)
        .with_key(Arc::new(SymmetricKey::new(&[0x01; 32])))
        .encode()
        .expect("encode");

    let policy = TokenValidationPolicy::builder()
        .require_claim("sub")
        .require_signature(signing_keys([SymmetricKey::new(&SIGNING_KEY)]))
        .build();
    assert_eq!(policy.validator_count(), 2);
    assert_eq!(
        read(&token, &policy).expect_err("both fail"),
        ValidationError::SignatureFailed
    );
}

struct DenyAll;

impl Validator for DenyAll {
    fn try_validate(&self, _jwt: &Jwt) -> Result<(), ValidationError> {
        Err(ValidationError::InvalidClaim("custom".into()))
    }
}

#[test]
fn test_custom_validators_run_in_order() {
    let token = unsigned(json!({"sub": "alice"}));
    let policy = TokenValidationPolicy::builder()
        .add_validator(RequiredClaimValidator::new("sub"))
        .add_validator(DenyAll)
        .add_validator(RequiredClaimValidator::new("missing"))
        .build();
    assert_eq!(
        read(&token, &policy).expect_err("denied"),
        ValidationError::InvalidClaim("custom".into())
    );
    assert_eq!(TokenValidationPolicy::no_validation().validator_count(), 0);
}

fn encrypted_claims(claims: serde_json::Value) -> String {
    let serde_json::Value::Object(map) = claims else {
        panic!("claims must be an object");
    };
    JweDescriptor::new(
        JwePayload::Claims(map),
        Arc::new(SymmetricKey::new(&ENCRYPTION_KEY)),
        KeyManagementAlgorithm::Direct,
        EncryptionAlgorithm::Aes128CbcHmacSha256,
    )
    .encode()
    .expect("encode")
}

fn encrypted_bytes(bytes: &[u8], cty: &str) -> String {
    BinaryJweDescriptor::new(
        bytes.to_vec(),
        Arc::new(SymmetricKey::new(&ENCRYPTION_KEY)),
        KeyManagementAlgorithm::Direct,
        EncryptionAlgorithm::Aes128CbcHmacSha256,
    )
    .with_content_type(cty)
    .encode()
    .expect("encode")
}

fn decrypting_reader() -> JwtReader {
    JwtReader::new().with_keys([SymmetricKey::new(&ENCRYPTION_KEY)])
}

#[test]
fn test_encrypted_claims_go_through_the_policy() {
    let reader = decrypting_reader();
    let now = Utc::now().timestamp();
    let expired = encrypted_claims(json!({"sub": "alice", "exp": now - 86_400}));

    let strict = TokenValidationPolicy::builder()
        .require_claim("iss")
        .enable_lifetime_validation(true, Duration::zero())
        .build();
    assert_eq!(
        reader.try_read_token(&expired, &strict).expect_err("missing iss"),
        ValidationError::MissingClaim("iss".into())
    );

    let lifetime = TokenValidationPolicy::builder()
        .enable_lifetime_validation(true, Duration::zero())
        .build();
    assert_eq!(
        reader.try_read_token(&expired, &lifetime).expect_err("expired"),
        ValidationError::Expired
    );

    let fresh = encrypted_claims(json!({
        "sub": "alice",
        "iss": "https://issuer.example",
        "aud": "api",
        "exp": now + 3_600
    }));
    let jwt = reader
        .try_read_token(&fresh, &strict)
        .expect("valid encrypted claims");
    assert_eq!(jwt.subject(), Some("alice"));
    assert!(jwt.nested().is_none());

    let other_audience = TokenValidationPolicy::builder()
        .require_audience("web")
        .build();
    assert_eq!(
        reader.try_read_token(&fresh, &other_audience).expect_err("audience"),
        ValidationError::InvalidClaim("aud".into())
    );

    // an encrypted claim set carries no signature
    let signed_only = TokenValidationPolicy::builder()
        .require_signature(signing_keys([SymmetricKey::new(&SIGNING_KEY)]))
        .build();
    assert_eq!(
        reader.try_read_token(&fresh, &signed_only).expect_err("unsigned"),
        ValidationError::SignatureFailed
    );
}

#[test]
fn test_encrypted_binary_payloads_and_the_policy() {
    let reader = decrypting_reader();
    let strict = TokenValidationPolicy::builder()
        .require_claim("iss")
        .enable_lifetime_validation(true, Duration::zero())
        .build();

    // opaque bytes expose no claims, so there is nothing to validate
    let opaque = encrypted_bytes(&[0xde, 0xad, 0xbe, 0xef], "application/octet-stream");
    let jwt = reader
        .try_read_token(&opaque, &strict)
        .expect("opaque plaintext");
    assert_eq!(jwt.binary(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
    assert!(jwt.payload().is_none());
    assert!(jwt.subject().is_none());

    // a JSON object is a claim set whatever the content type says
    let json_object = encrypted_bytes(br#"{"sub":"alice"}"#, "application/json");
    assert_eq!(
        reader.try_read_token(&json_object, &strict).expect_err("missing iss"),
        ValidationError::MissingClaim("iss".into())
    );
    let jwt = reader
        .try_read_token(&json_object, &TokenValidationPolicy::no_validation())
        .expect("no validators");
    assert_eq!(jwt.subject(), Some("alice"));
}
