//! SHA-1 hash primitive backed by the `sha1` crate. Kept for legacy
//! interoperability such as HMAC-SHA1 and HKDF-SHA1.

use std::sync::Arc;

use sha1::Digest;

use super::{
    check_digest_out, HashFunction, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};
use crate::error::CryptoResult;

pub const NAME: &str = "sha1";
pub const DIGEST_SIZE: usize = 20;
pub const BLOCK_SIZE: usize = 64;

#[derive(Clone, Default)]
pub struct Sha1 {
    inner: sha1::Sha1,
}

impl Sha1 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for Sha1 {
    fn digest_len(&self) -> usize {
        DIGEST_SIZE
    }

    fn block_len(&self) -> usize {
        BLOCK_SIZE
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> CryptoResult<usize> {
        check_digest_out(DIGEST_SIZE, out)?;
        let digest = self.inner.finalize_reset();
        out[..DIGEST_SIZE].copy_from_slice(&digest);
        Ok(DIGEST_SIZE)
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.inner);
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::hash(NAME, DIGEST_SIZE, BLOCK_SIZE, std::mem::size_of::<Sha1>())
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|_key: &[u8], params: &Params| match params {
            Params::None => Ok(PrimitiveInstance::Hash(Box::new(Sha1::new()))),
            other => Err(other.unsupported(NAME)),
        }),
    )
}
