//! CBC mode with PKCS#7 padding

use jwx_cipher::{cbc, Aes, CipherError};

const IV: [u8; 16] = [0x24; 16];

#[test]
fn test_padded_len_always_adds_a_block_boundary() {
    assert_eq!(cbc::padded_len(0), 16);
    assert_eq!(cbc::padded_len(1), 16);
    assert_eq!(cbc::padded_len(15), 16);
    assert_eq!(cbc::padded_len(16), 32);
    assert_eq!(cbc::padded_len(33), 48);
}

#[test]
fn test_round_trip_every_length_up_to_three_blocks() {
    let cipher = Aes::new(&[9u8; 16]).expect("valid key");
    for len in 0..=48 {
        let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let snapshot = plaintext.clone();
        let mut ciphertext = vec![0u8; cbc::padded_len(len)];
        let written =
            cbc::encrypt(cipher.as_ref(), &IV, &plaintext, &mut ciphertext).expect("encrypt");
        assert_eq!(written, ciphertext.len());
        // caller input is never padded in place
        assert_eq!(plaintext, snapshot);

        let mut recovered = vec![0u8; ciphertext.len()];
        let n = cbc::decrypt(cipher.as_ref(), &IV, &ciphertext, &mut recovered).expect("decrypt");
        assert_eq!(&recovered[..n], plaintext.as_slice());
    }
}

#[test]
fn test_exact_destination_is_enough_for_decrypt() {
    let cipher = Aes::new(&[3u8; 32]).expect("valid key");
    let plaintext = b"exactly twenty bytes";
    let mut ciphertext = vec![0u8; 32];
    cbc::encrypt(cipher.as_ref(), &IV, plaintext, &mut ciphertext).expect("encrypt");

    let mut exact = vec![0u8; plaintext.len()];
    let n = cbc::decrypt(cipher.as_ref(), &IV, &ciphertext, &mut exact).expect("decrypt");
    assert_eq!(n, plaintext.len());
    assert_eq!(exact.as_slice(), plaintext);

    let mut short = vec![0u8; plaintext.len() - 1];
    let err = cbc::decrypt(cipher.as_ref(), &IV, &ciphertext, &mut short).expect_err("too small");
    assert!(matches!(err, CipherError::DestinationTooSmall { required: 20, actual: 19 }));
}

#[test]
fn test_rejects_partial_blocks_and_small_output() {
    let cipher = Aes::new(&[1u8; 24]).expect("valid key");
    let mut out = [0u8; 64];
    assert!(matches!(
        cbc::decrypt(cipher.as_ref(), &IV, &[0u8; 15], &mut out),
        Err(CipherError::InvalidCiphertextLength(15))
    ));
    assert!(matches!(
        cbc::decrypt(cipher.as_ref(), &IV, &[], &mut out),
        Err(CipherError::InvalidCiphertextLength(0))
    ));

    let mut small = [0u8; 16];
    assert!(matches!(
        cbc::encrypt(cipher.as_ref(), &IV, &[0u8; 16], &mut small),
        Err(CipherError::DestinationTooSmall { required: 32, .. })
    ));
}

#[test]
fn test_bad_padding_is_reported_without_output() {
    let cipher = Aes::new(&[5u8; 16]).expect("valid key");
    // E(IV) decrypts to an all-zero block, so the padding byte is zero
    let mut block = IV;
    cipher.encrypt_block(&mut block);

    let mut out = [0xEEu8; 16];
    let err = cbc::decrypt(cipher.as_ref(), &IV, &block, &mut out).expect_err("pad byte zero");
    assert_eq!(err, CipherError::InvalidPadding);
    assert_eq!(out, [0xEEu8; 16]);
}
