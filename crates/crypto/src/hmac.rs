//! HMAC (RFC 2104) over any registered hash primitive.
//!
//! Keys longer than the hash block are hashed first; shorter keys are
//! zero-padded to the block length. The padded key stays in a
//! [`SecureBuffer`] for the life of the context.

use crate::digest::instantiate_hash;
use crate::error::{CryptoError, CryptoResult};
use crate::primitives::{HashFunction, Params, Primitive};
use crate::secure_mem::SecureBuffer;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

pub struct Hmac {
    inner: Box<dyn HashFunction>,
    outer: Box<dyn HashFunction>,
    key: SecureBuffer,
}

impl Hmac {
    pub fn new(primitive: &Primitive, params: &Params, key: &[u8]) -> CryptoResult<Self> {
        let mut inner = instantiate_hash(primitive, params)?;
        let outer = instantiate_hash(primitive, params)?;

        let block_len = inner.block_len();
        let digest_len = inner.digest_len();
        if digest_len > block_len {
            return Err(CryptoError::InvalidParameter(format!(
                "{} digest of {} bytes exceeds its {}-byte block",
                primitive.name(),
                digest_len,
                block_len
            )));
        }

        let mut padded = SecureBuffer::allocate(block_len);
        if key.len() > block_len {
            inner.update(key);
            inner.finalize_into(padded.expose_mut())?;
        } else {
            padded.write(0, key)?;
        }

        let mut mac = Self {
            inner,
            outer,
            key: padded,
        };
        mac.start_inner();
        Ok(mac)
    }

    pub fn mac_len(&self) -> usize {
        self.inner.digest_len()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Writes the tag into `out` and readies the context for a new message
    /// under the same key.
    pub fn finalize(&mut self, out: &mut [u8]) -> CryptoResult<usize> {
        let len = self.mac_len();
        if out.len() < len {
            return Err(CryptoError::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        }

        let mut inner_hash = SecureBuffer::allocate(len);
        self.inner.finalize_into(inner_hash.expose_mut())?;

        let mut outer_key = self.masked_key(OPAD);
        self.outer.reset();
        self.outer.update(outer_key.expose());
        self.outer.update(inner_hash.expose());
        outer_key.release();

        let written = self.outer.finalize_into(out)?;
        self.start_inner();
        Ok(written)
    }

    fn start_inner(&mut self) {
        let inner_key = self.masked_key(IPAD);
        self.inner.reset();
        self.inner.update(inner_key.expose());
    }

    fn masked_key(&self, pad: u8) -> SecureBuffer {
        let mut masked = SecureBuffer::from_slice(self.key.expose());
        for b in masked.expose_mut() {
            *b ^= pad;
        }
        masked
    }
}

/// One-shot tag of `message` under `key`.
pub fn hmac(
    primitive: &Primitive,
    params: &Params,
    key: &[u8],
    message: &[u8],
) -> CryptoResult<Vec<u8>> {
    let mut mac = Hmac::new(primitive, params, key)?;
    mac.update(message);
    let mut tag = vec![0u8; mac.mac_len()];
    mac.finalize(&mut tag)?;
    Ok(tag)
}
