//! Differential tests against the RustCrypto `sha2` and `hmac` crates

use hmac::Mac;
use jwx_hashing::{HmacSha256, HmacSha384, HmacSha512, Sha2, Sha256, Sha384, Sha512};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sha2_matches_reference(data in proptest::collection::vec(any::<u8>(), 0..600)) {
        use sha2::Digest;
        prop_assert_eq!(Sha256::digest(&data), sha2::Sha256::digest(&data).to_vec());
        prop_assert_eq!(Sha384::digest(&data), sha2::Sha384::digest(&data).to_vec());
        prop_assert_eq!(Sha512::digest(&data), sha2::Sha512::digest(&data).to_vec());
    }

    #[test]
    fn hmac_matches_reference(
        key in proptest::collection::vec(any::<u8>(), 0..200),
        data in proptest::collection::vec(any::<u8>(), 0..300),
    ) {
        let mut reference = hmac::Hmac::<sha2::Sha256>::new_from_slice(&key)
            .expect("HMAC accepts any key length");
        reference.update(&data);
        prop_assert_eq!(
            HmacSha256::new(&key).compute_vec(&data),
            reference.finalize().into_bytes().to_vec()
        );

        let mut reference = hmac::Hmac::<sha2::Sha384>::new_from_slice(&key)
            .expect("HMAC accepts any key length");
        reference.update(&data);
        prop_assert_eq!(
            HmacSha384::new(&key).compute_vec(&data),
            reference.finalize().into_bytes().to_vec()
        );

        let mut reference = hmac::Hmac::<sha2::Sha512>::new_from_slice(&key)
            .expect("HMAC accepts any key length");
        reference.update(&data);
        prop_assert_eq!(
            HmacSha512::new(&key).compute_vec(&data),
            reference.finalize().into_bytes().to_vec()
        );
    }
}
