//! HMAC (RFC 2104) over the SHA-2 family
//!
//! The inner and outer hash states are absorbed once at construction, so
//! each MAC computation only clones two hasher states.

use crate::error::{HashError, Result};
use crate::sha::{Sha2, Sha256, Sha384, Sha512, MAX_BLOCK_SIZE, MAX_HASH_SIZE};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC-SHA-256
pub type HmacSha256 = Hmac<Sha256>;
/// HMAC-SHA-384
pub type HmacSha384 = Hmac<Sha384>;
/// HMAC-SHA-512
pub type HmacSha512 = Hmac<Sha512>;

/// Keyed HMAC instance with precomputed pad states
#[derive(Clone)]
pub struct Hmac<H: Sha2> {
    inner: H,
    outer: H,
}

impl<H: Sha2> Hmac<H> {
    /// Full tag size in bytes
    pub const TAG_SIZE: usize = H::HASH_SIZE;

    /// Key the MAC. Keys longer than the block size are hashed first.
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        let mut block = Zeroizing::new([0u8; MAX_BLOCK_SIZE]);
        if key.len() > H::BLOCK_SIZE {
            let mut hasher = H::default();
            hasher.update(key);
            let mut digest = [0u8; MAX_HASH_SIZE];
            hasher.finalize_fixed(&mut digest);
            block[..H::HASH_SIZE].copy_from_slice(&digest[..H::HASH_SIZE]);
            digest.zeroize();
        } else {
            block[..key.len()].copy_from_slice(key);
        }

        let pad = &mut block[..H::BLOCK_SIZE];
        pad.iter_mut().for_each(|b| *b ^= IPAD);
        let mut inner = H::default();
        inner.update(pad);

        pad.iter_mut().for_each(|b| *b ^= IPAD ^ OPAD);
        let mut outer = H::default();
        outer.update(pad);

        Self { inner, outer }
    }

    /// Begin an incremental computation
    #[inline]
    #[must_use]
    pub fn start(&self) -> HmacContext<'_, H> {
        HmacContext {
            inner: self.inner.clone(),
            outer: &self.outer,
        }
    }

    /// MAC `data` into `output`, truncating to `output.len()` bytes
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidTruncation`] when `output` is empty or
    /// longer than [`Self::TAG_SIZE`].
    #[inline]
    pub fn compute(&self, data: &[u8], output: &mut [u8]) -> Result<()> {
        let mut ctx = self.start();
        ctx.update(data);
        ctx.finalize_into(output)
    }

    /// Full-length MAC of `data`
    #[must_use]
    pub fn compute_vec(&self, data: &[u8]) -> Vec<u8> {
        let mut ctx = self.start();
        ctx.update(data);
        let mut tag = [0u8; MAX_HASH_SIZE];
        ctx.finish(&mut tag);
        tag[..H::HASH_SIZE].to_vec()
    }

    /// Constant-time check of a (possibly truncated) tag
    #[must_use]
    pub fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        let mut ctx = self.start();
        ctx.update(data);
        ctx.verify(expected)
    }
}

/// In-progress HMAC computation borrowed from an [`Hmac`]
pub struct HmacContext<'a, H: Sha2> {
    inner: H,
    outer: &'a H,
}

impl<H: Sha2> HmacContext<'_, H> {
    /// Absorb more message bytes
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finish(self, tag: &mut [u8; MAX_HASH_SIZE]) {
        let mut inner_digest = [0u8; MAX_HASH_SIZE];
        self.inner.finalize_fixed(&mut inner_digest);
        let mut outer = self.outer.clone();
        outer.update(&inner_digest[..H::HASH_SIZE]);
        outer.finalize_fixed(tag);
        inner_digest.zeroize();
    }

    /// Finish and write the first `output.len()` tag bytes
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidTruncation`] when `output` is empty or
    /// longer than the digest.
    pub fn finalize_into(self, output: &mut [u8]) -> Result<()> {
        if output.is_empty() || output.len() > H::HASH_SIZE {
            return Err(HashError::InvalidTruncation {
                max: H::HASH_SIZE,
                actual: output.len(),
            });
        }
        let mut tag = [0u8; MAX_HASH_SIZE];
        self.finish(&mut tag);
        output.copy_from_slice(&tag[..output.len()]);
        tag.zeroize();
        Ok(())
    }

    /// Finish and compare against `expected` in constant time
    ///
    /// `expected` may be a truncated tag. An empty or over-long tag never
    /// verifies.
    #[must_use]
    pub fn verify(self, expected: &[u8]) -> bool {
        if expected.is_empty() || expected.len() > H::HASH_SIZE {
            return false;
        }
        let mut tag = [0u8; MAX_HASH_SIZE];
        self.finish(&mut tag);
        let equal = tag[..expected.len()].ct_eq(expected);
        tag.zeroize();
        equal.into()
    }
}
