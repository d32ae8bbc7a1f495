//! BLAKE3 hash primitive backed by the `blake3` crate.

use std::sync::Arc;

use super::{
    check_digest_out, HashFunction, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};
use crate::error::CryptoResult;

pub const NAME: &str = "blake3";
pub const DIGEST_SIZE: usize = blake3::OUT_LEN;
pub const BLOCK_SIZE: usize = 64;

#[derive(Clone, Default)]
pub struct Blake3 {
    inner: blake3::Hasher,
}

impl Blake3 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for Blake3 {
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
        let hash = self.inner.finalize();
        out[..DIGEST_SIZE].copy_from_slice(hash.as_bytes());
        self.inner.reset();
        Ok(DIGEST_SIZE)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::hash(
        NAME,
        DIGEST_SIZE,
        BLOCK_SIZE,
        std::mem::size_of::<Blake3>(),
    )
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|_key: &[u8], params: &Params| match params {
            Params::None => Ok(PrimitiveInstance::Hash(Box::new(Blake3::new()))),
            other => Err(other.unsupported(NAME)),
        }),
    )
}
