//! Authenticated encryption: RFC 7518 Appendix B vectors and AEAD laws

use hex_literal::hex;
use jwx_cipher::{create_encryptor, CipherError, EncryptionAlgorithm};

const PLAINTEXT: &[u8] = b"A cipher system must not be required to be secret, and it must be able to fall into the hands of the enemy without inconvenience";
const AAD: &[u8] = b"The second principle of Auguste Kerckhoffs";
const IV: [u8; 16] = hex!("1af38c2dc2b96ffdd86694092341bc04");

fn key(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn check_vector(alg: EncryptionAlgorithm, expected_ct: &str, expected_tag: &str) {
    let enc = create_encryptor(&key(alg.key_size()), alg).expect("valid key");
    let mut ct = vec![0u8; enc.ciphertext_size(PLAINTEXT.len())];
    let mut tag = vec![0u8; enc.tag_size()];
    let n = enc
        .encrypt(PLAINTEXT, &IV, AAD, &mut ct, &mut tag)
        .expect("encrypt");
    assert_eq!(hex::encode(&ct[..n]), expected_ct);
    assert_eq!(hex::encode(&tag), expected_tag);

    let mut pt = vec![0u8; n];
    let m = enc
        .try_decrypt(&ct[..n], AAD, &IV, &tag, &mut pt)
        .expect("authentic");
    assert_eq!(&pt[..m], PLAINTEXT);
}

#[test]
fn test_rfc7518_b1_a128cbc_hs256() {
    check_vector(
        EncryptionAlgorithm::Aes128CbcHmacSha256,
        concat!(
            "c80edfa32ddf39d5ef00c0b468834279a2e46a1b8049f792f76bfe54b903a9c9",
            "a94ac9b47ad2655c5f10f9aef71427e2fc6f9b3f399a221489f16362c7032336",
            "09d45ac69864e3321cf82935ac4096c86e133314c54019e8ca7980dfa4b9cf1b",
            "384c486f3a54c51078158ee5d79de59fbd34d848b3d69550a67646344427ade5",
            "4b8851ffb598f7f80074b9473c82e2db"
        ),
        "652c3fa36b0a7c5b3219fab3a30bc1c4",
    );
}

#[test]
fn test_rfc7518_b2_a192cbc_hs384() {
    check_vector(
        EncryptionAlgorithm::Aes192CbcHmacSha384,
        concat!(
            "ea65da6b59e61edb419be62d19712ae5d303eeb50052d0dfd6697f77224c8edb",
            "000d279bdc14c1072654bd30944230c657bed4ca0c9f4a8466f22b226d174621",
            "4bf8cfc2400add9f5126e479663fc90b3bed787a2f0ffcbf3904be2a641d5c21",
            "05bfe591bae23b1d7449e532eef60a9ac8bb6c6b01d35d49787bcd57ef484927",
            "f280adc91ac0c4e79c7b11efc60054e3"
        ),
        "8490ac0e58949bfe51875d733f93ac2075168039ccc733d7",
    );
}

#[test]
fn test_rfc7518_b3_a256cbc_hs512() {
    check_vector(
        EncryptionAlgorithm::Aes256CbcHmacSha512,
        concat!(
            "4affaaadb78c31c5da4b1b590d10ffbd3dd8d5d302423526912da037ecbcc7bd",
            "822c301dd67c373bccb584ad3e9279c2e6d12a1374b77f077553df829410446b",
            "36ebd97066296ae6427ea75c2e0846a11a09ccf5370dc80bfecbad28c73f09b3",
            "a3b75e662a2594410ae496b2e2e6609e31e6e02cc837f053d21f37ff4f51950b",
            "be2638d09dd7a4930930806d0703b1f6"
        ),
        "4dd3b4c088a7f45c216839645b2012bf2e6269a8c56a816dbc1b267761955bc5",
    );
}

#[test]
fn test_gcm_known_answers() {
    let nonce: [u8; 12] = hex!("000102030405060708090a0b");
    let aad = b"eyJhbGciOiJkaXIiLCJlbmMiOiJBMTI4R0NNIn0";
    let cases = [
        (
            EncryptionAlgorithm::Aes128Gcm,
            "df05d1ab4677983a2cf200e45283007adc556a8321c3",
            "c0c7fd22b663162912afb17df8933ae1",
        ),
        (
            EncryptionAlgorithm::Aes192Gcm,
            "aa9054feb9d5a660b713bdec9b89ac0261ec436e4a8f",
            "b485bedcd1ef5ef3c12290dc9a9c060f",
        ),
        (
            EncryptionAlgorithm::Aes256Gcm,
            "0b6ba07ee589ad75ea61f6e5d5c9081feca5f7518255",
            "e8dfae9c0c2d270261252a821784066a",
        ),
    ];
    for (alg, expected_ct, expected_tag) in cases {
        let enc = create_encryptor(&key(alg.key_size()), alg).expect("valid key");
        let plaintext = b"Live long and prosper.";
        let mut ct = vec![0u8; plaintext.len()];
        let mut tag = [0u8; 16];
        enc.encrypt(plaintext, &nonce, aad, &mut ct, &mut tag)
            .expect("encrypt");
        assert_eq!(hex::encode(&ct), expected_ct, "{alg}");
        assert_eq!(hex::encode(tag), expected_tag, "{alg}");
    }
}

#[test]
fn test_round_trip_every_algorithm() {
    for alg in EncryptionAlgorithm::ALL {
        let enc = create_encryptor(&vec![0x42; alg.key_size()], alg).expect("valid key");
        let nonce = vec![7u8; enc.nonce_size()];
        for len in [0usize, 1, 15, 16, 17, 100] {
            let plaintext = vec![0x61u8; len];
            let mut ct = vec![0u8; enc.ciphertext_size(len)];
            let mut tag = vec![0u8; enc.tag_size()];
            let n = enc
                .encrypt(&plaintext, &nonce, b"aad", &mut ct, &mut tag)
                .expect("encrypt");

            let mut pt = vec![0u8; n];
            let m = enc
                .try_decrypt(&ct[..n], b"aad", &nonce, &tag, &mut pt)
                .expect("decrypt");
            assert_eq!(&pt[..m], plaintext.as_slice(), "{alg} len {len}");
        }
    }
}

#[test]
fn test_tampering_fails_without_writing_output() {
    for alg in EncryptionAlgorithm::ALL {
        let enc = create_encryptor(&vec![0x11; alg.key_size()], alg).expect("valid key");
        let nonce = vec![3u8; enc.nonce_size()];
        let mut ct = vec![0u8; enc.ciphertext_size(40)];
        let mut tag = vec![0u8; enc.tag_size()];
        let n = enc
            .encrypt(&[0x55; 40], &nonce, b"header", &mut ct, &mut tag)
            .expect("encrypt");
        ct.truncate(n);

        let mut bad_tag = tag.clone();
        bad_tag[0] ^= 0x80;
        let mut bad_ct = ct.clone();
        bad_ct[n - 1] ^= 1;

        for (c, aad, t) in [
            (&ct, &b"header"[..], &bad_tag),
            (&bad_ct, &b"header"[..], &tag),
            (&ct, &b"Header"[..], &tag),
        ] {
            let mut out = vec![0xEEu8; n];
            let err = enc
                .try_decrypt(c, aad, &nonce, t, &mut out)
                .expect_err("tampered input must not authenticate");
            assert_eq!(err, CipherError::AuthenticationFailed, "{alg}");
            assert!(out.iter().all(|&b| b == 0xEE), "{alg} leaked output");
        }
    }
}

#[test]
fn test_size_errors_are_distinct_from_authentication() {
    let enc = create_encryptor(&[1u8; 16], EncryptionAlgorithm::Aes128Gcm).expect("valid key");
    let mut ct = [0u8; 8];
    let mut tag = [0u8; 16];
    enc.encrypt(b"8 bytes!", &[0u8; 12], b"", &mut ct, &mut tag)
        .expect("encrypt");

    let mut small = [0u8; 7];
    let err = enc
        .try_decrypt(&ct, b"", &[0u8; 12], &tag, &mut small)
        .expect_err("destination too small");
    assert!(matches!(err, CipherError::DestinationTooSmall { required: 8, actual: 7 }));

    let err = enc
        .try_decrypt(&ct, b"", &[0u8; 16], &tag, &mut [0u8; 8])
        .expect_err("GCM nonce is 96 bits");
    assert!(matches!(err, CipherError::InvalidNonceLength { expected: 12, actual: 16 }));
}

#[test]
fn test_key_size_enforced_at_construction() {
    for alg in EncryptionAlgorithm::ALL {
        let short = vec![0u8; alg.key_size() - 1];
        let err = create_encryptor(&short, alg).err().expect("short key");
        assert!(matches!(err, CipherError::InvalidKeyLength { .. }), "{alg}");
    }
}

#[test]
fn test_algorithm_names_round_trip() {
    for alg in EncryptionAlgorithm::ALL {
        assert_eq!(alg.name().parse::<EncryptionAlgorithm>(), Ok(alg));
    }
    assert!("A128CBC".parse::<EncryptionAlgorithm>().is_err());
}
